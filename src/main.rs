use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tourguide::ai::SuggestionOutcome;
use tourguide::{
    AiService, Catalog, Coordinates, DetailOutcome, Effect, FetchTicket, GuideConfig, Intent,
    Session, SuggestionTicket, logging, map, render,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const HELP: &str = "\
Commands:
  list                 show visible locations
  map                  show map pins and framing
  themes | tours       show theme and tour choices
  theme <name>         filter by theme (all_themes to reset)
  tour <id>            filter by tour (all_tours to reset)
  open <id>            open a location's details
  close                close the details
  more                 ask the AI for more about the open location
  ar                   view the open location in AR (simulated)
  suggest              ask the AI for a new tour idea
  near <lat>,<lng>     center on a position and show the nearest location
  help | quit";

#[derive(Debug, PartialEq)]
enum Command {
    Intent(Intent),
    List,
    Map,
    Pickers,
    Near(Coordinates),
    Ar,
    Help,
    Quit,
    Invalid(String),
}

/// AI results travelling back to the event loop
enum AiResult {
    Detail(FetchTicket, DetailOutcome),
    Suggestion(SuggestionTicket, SuggestionOutcome),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match (word, rest) {
        ("list" | "ls", _) => Command::List,
        ("map", _) => Command::Map,
        ("themes" | "tours", _) => Command::Pickers,
        ("theme", name) if !name.is_empty() => {
            Command::Intent(Intent::SelectTheme(name.to_string()))
        }
        ("tour", id) if !id.is_empty() => Command::Intent(Intent::SelectTour(id.to_string())),
        ("open" | "pick", id) if !id.is_empty() => Command::Intent(Intent::Pick(id.to_string())),
        ("close", _) => Command::Intent(Intent::Dismiss),
        ("more", _) => Command::Intent(Intent::TellMeMore),
        ("suggest", _) => Command::Intent(Intent::SuggestTour),
        ("ar", _) => Command::Ar,
        ("near", position) => match parse_position(position) {
            Some(coords) => Command::Near(coords),
            None => Command::Invalid("Position must be '<lat>,<lng>'".to_string()),
        },
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Invalid(format!("Unknown command '{line}', type 'help'")),
    }
}

fn parse_position(input: &str) -> Option<Coordinates> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    let [lat, lng] = parts.as_slice() else {
        return None;
    };
    let coords = Coordinates::new(lat.parse().ok()?, lng.parse().ok()?);
    coords.is_valid().then_some(coords)
}

/// Start the AI call an intent asked for; results come back over `tx`
fn launch(effect: Effect, session: &Session, tx: &mpsc::UnboundedSender<AiResult>) {
    match effect {
        Effect::None => {}
        Effect::Rejected(message) => println!("{message}"),
        Effect::FetchDetails {
            ticket,
            location_name,
            known_facts,
        } => {
            let ai = session.ai().clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = ai.fetch_details(&location_name, &known_facts).await;
                // the receiver lives as long as the event loop
                let _ = tx.send(AiResult::Detail(ticket, outcome));
            });
        }
        Effect::SuggestTour {
            ticket,
            themes,
            tour_names,
        } => {
            let ai = session.ai().clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = ai.suggest_tour(&themes, &tour_names).await;
                let _ = tx.send(AiResult::Suggestion(ticket, outcome));
            });
        }
    }
}

fn show_after_intent(session: &Session) {
    match render::detail(session) {
        Some(detail) => print!("{detail}"),
        None => print!("{}", render::location_list(session)),
    }
    if let Some(suggestion) = render::suggestion(session) {
        print!("{suggestion}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GuideConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;

    let catalog = match &config.catalog.path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::london(),
    };
    let ai = AiService::from_config(&config)?;
    let mut session = Session::new(catalog, ai);

    println!("Historical London guide ({})", session.id());
    if let Some(reason) = session.ai().unavailable_reason() {
        println!("{reason}");
    }
    println!("{HELP}\n");
    print!("{}", render::location_list(&session));

    let (tx, mut rx) = mpsc::unbounded_channel::<AiResult>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Command::Intent(intent) => {
                        let effect = session.handle(intent);
                        launch(effect, &session, &tx);
                        show_after_intent(&session);
                    }
                    Command::List => print!("{}", render::location_list(&session)),
                    Command::Map => print!("{}", render::map_summary(&session)),
                    Command::Pickers => print!("{}", render::pickers(&session)),
                    Command::Near(position) => {
                        println!("Map: {}", render::viewport(&map::user_view(position)));
                        match session.nearest(&position) {
                            Some((location, km)) => println!(
                                "Nearest: [{}] {} ({km:.2} km)",
                                location.id, location.name
                            ),
                            None => println!("No visible locations"),
                        }
                    }
                    Command::Ar => match session.selected_location() {
                        Some(location) => println!("{}", render::ar_message(location)),
                        None => println!("Open a location first"),
                    },
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                    Command::Invalid(message) => println!("{message}"),
                }
            }
            Some(result) = rx.recv() => match result {
                AiResult::Detail(ticket, outcome) => {
                    if session.on_detail(&ticket, outcome) {
                        if let Some(detail) = render::detail(&session) {
                            print!("{detail}");
                        }
                    }
                }
                AiResult::Suggestion(ticket, outcome) => {
                    if session.on_suggestion(ticket, outcome) {
                        if let Some(suggestion) = render::suggestion(&session) {
                            print!("{suggestion}");
                        }
                    }
                }
            },
        }
    }

    Ok(())
}
