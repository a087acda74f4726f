//! Prompt text sent to the language model

/// Prompt asking for a lesser-known story about a location
#[must_use]
pub fn location_details(location_name: &str, existing_facts: &[String]) -> String {
    format!(
        "Tell me an interesting story, a lesser-known fact, or a fascinating anecdote about \"{location_name}\" in London.\n\
This information will be presented to tourists in an app.\n\
Avoid simply rephrasing these known facts: {}.\n\
Keep it concise, about 2-4 sentences, and engaging.\n\
If possible, use Google Search grounding to provide up-to-date or very specific information.",
        existing_facts.join("; ")
    )
}

/// Prompt asking for one new thematic tour idea
#[must_use]
pub fn tour_idea(existing_themes: &[String], existing_tour_names: &[String]) -> String {
    format!(
        "You are a creative tour guide assistant for London.\n\
Based on the following existing historical themes in London: {}.\n\
And considering these existing tour names to avoid duplicates: {}.\n\
Suggest ONE new, creative thematic walking tour idea.\n\
Provide a catchy, unique tour name and a brief 1-2 sentence description.\n\
Format your response as:\n\
Tour Name: [Name]\n\
Description: [Description]",
        existing_themes.join(", "),
        existing_tour_names.join(", ")
    )
}
