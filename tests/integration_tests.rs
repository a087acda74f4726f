//! Integration tests for the tour guide

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tokio::sync::{Mutex, oneshot};
use tourguide::ai::LocationDetails;
use tourguide::{
    AiService, Catalog, DetailOutcome, DetailSlot, Effect, GuideError, Intent, NarrativeProvider,
    Session, ViewState,
};

/// Provider whose answers are released by the test through oneshot channels,
/// one per location name
struct GatedProvider {
    gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
}

impl GatedProvider {
    fn new<const N: usize>(gates: [(&str, oneshot::Receiver<String>); N]) -> Self {
        Self {
            gates: Mutex::new(
                gates
                    .into_iter()
                    .map(|(name, gate)| (name.to_string(), gate))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl NarrativeProvider for GatedProvider {
    async fn location_details(
        &self,
        location_name: &str,
        _known_facts: &[String],
    ) -> tourguide::Result<LocationDetails> {
        let gate = self
            .gates
            .lock()
            .await
            .remove(location_name)
            .ok_or_else(|| GuideError::api("no gate for location"))?;
        let text = gate.await.map_err(|_| GuideError::api("gate dropped"))?;
        Ok(LocationDetails {
            text,
            citations: vec![],
        })
    }

    async fn suggest_tour(&self, _: &[String], _: &[String]) -> tourguide::Result<String> {
        Err(GuideError::api("not used"))
    }
}

fn fetch(
    effect: Effect,
    ai: AiService,
) -> tokio::task::JoinHandle<(tourguide::FetchTicket, DetailOutcome)> {
    match effect {
        Effect::FetchDetails {
            ticket,
            location_name,
            known_facts,
        } => tokio::spawn(async move {
            let outcome = ai.fetch_details(&location_name, &known_facts).await;
            (ticket, outcome)
        }),
        other => panic!("expected a fetch effect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_late_answer_for_previous_location_is_dropped() {
    let (tower_tx, tower_rx) = oneshot::channel();
    let (palace_tx, palace_rx) = oneshot::channel();
    let ai = AiService::new(Arc::new(GatedProvider::new([
        ("Tower of London", tower_rx),
        ("Buckingham Palace", palace_rx),
    ])));
    let mut session = Session::new(Catalog::london(), ai.clone());

    session.handle(Intent::Pick("loc1".into()));
    let tower_call = fetch(session.handle(Intent::TellMeMore), ai.clone());

    // visitor moves on while the first call is still pending
    session.handle(Intent::Pick("loc6".into()));
    assert_eq!(session.selection().detail(), &DetailSlot::Empty);
    let palace_call = fetch(session.handle(Intent::TellMeMore), ai);

    palace_tx.send("Palace story".to_string()).unwrap();
    let (ticket, outcome) = palace_call.await.unwrap();
    assert!(session.on_detail(&ticket, outcome));

    tower_tx.send("Tower story".to_string()).unwrap();
    let (ticket, outcome) = tower_call.await.unwrap();
    assert!(!session.on_detail(&ticket, outcome));

    assert_eq!(
        session.selection().detail(),
        &DetailSlot::Ready(DetailOutcome::Text("Palace story".into()))
    );
    assert_eq!(session.selection().view(), &ViewState::Viewing("loc6".into()));
}

#[tokio::test]
async fn test_reopening_after_dismiss_starts_clean() {
    let (tx, rx) = oneshot::channel();
    let ai = AiService::new(Arc::new(GatedProvider::new([("Westminster Abbey", rx)])));
    let mut session = Session::new(Catalog::london(), ai.clone());

    session.handle(Intent::Pick("loc7".into()));
    let call = fetch(session.handle(Intent::TellMeMore), ai);
    session.handle(Intent::Dismiss);
    session.handle(Intent::Pick("loc7".into()));

    tx.send("Abbey story".to_string()).unwrap();
    let (ticket, outcome) = call.await.unwrap();
    assert!(!session.on_detail(&ticket, outcome));
    assert_eq!(session.selection().detail(), &DetailSlot::Empty);
    assert!(session.selection().modal_open());
}

#[test]
fn test_filters_while_viewing() {
    let mut session = Session::new(Catalog::london(), AiService::disabled());
    session.handle(Intent::Pick("loc2".into()));

    session.handle(Intent::SelectTour("tour4".into()));
    let ids: Vec<_> = session.visible().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["loc6", "loc7"]);

    session.handle(Intent::SelectTheme("Royal".into()));
    let ids: Vec<_> = session.visible().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["loc6", "loc7"]);

    session.handle(Intent::SelectTour("tourX".into()));
    assert_eq!(session.visible().len(), 7);

    // the open location is not affected by filtering, even when hidden
    assert_eq!(session.selected_location().unwrap().id, "loc2");
}

/// Drive the binary through stdin with AI disabled
#[test]
fn test_cli_session_without_api_key() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tourguide"))
        .env_remove("API_KEY")
        .env_remove("TOURGUIDE_AI__API_KEY")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tourguide");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"theme Royal\nopen loc6\nmore\nar\nclose\nquit\n")
        .unwrap();

    let output = child.wait_with_output().expect("Failed to wait for tourguide");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("anonymousUser-"));
    assert!(stdout.contains("Locations (2, theme 'Royal')"));
    assert!(stdout.contains("== Buckingham Palace (Royal) =="));
    assert!(stdout.contains(tourguide::API_KEY_ERROR_MESSAGE));
    assert!(stdout.contains(
        "AR for Buckingham Palace would activate now! Asset: Generic model. Audio: None."
    ));
}

/// Test that the CLI shows help with the explicit help flag
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_tourguide"))
        .arg("--help")
        .output()
        .expect("Failed to start tourguide");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Historical points of interest explorer"));
    assert!(stdout.contains("--config"));
}

