//! Conversion prompts for both provider paths.
//!
//! Inline providers receive the page content inside a single user message; URL-fetching
//! providers get the appliance knowledge in the system channel and only the URL in the
//! user message.

use std::fmt::Write as _;

use mixo_llm::Message;

use crate::appliance::{
    GUIDED_TEMP_MAX_C, MANUAL_TEMP_MAX_C, MANUAL_TEMP_MIN_C, RULES, SPEED_TABLE, VAROMA_TEMP_C,
};

/// Page content longer than this is replaced by a truncation marker.
pub const MAX_CONTENT_CHARS: usize = 8000;

const TRUNCATED_MARKER: &str = "RECIPE CONTENT: (truncated for length)";

const OUTPUT_SHAPE: &str = r#"{
  "name": "Recipe Name",
  "description": "Brief description",
  "prepTime": "X min",
  "totalTime": "X min",
  "servings": 4,
  "ingredients": [
    {"amount": 200, "unit": "g", "item": "ingredient"}
  ],
  "steps": [
    {
      "stepNumber": 1,
      "title": "Short action",
      "instruction": "What to do",
      "settings": {"speed": "5", "temp": "100", "time": "3:00", "reverse": false, "mc": true},
      "note": "Brief tip"
    }
  ],
  "tips": ["tip 1", "tip 2"]
}"#;

/// What the server managed to retrieve for the recipe URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    Page(String),
    UrlOnly,
}

/// The `RECIPE CONTENT` line of the inline prompt.
#[must_use]
pub fn content_section(url: &str, source: &SourceContent) -> String {
    match source {
        SourceContent::Page(text) if text.chars().count() > MAX_CONTENT_CHARS => {
            TRUNCATED_MARKER.to_owned()
        }
        SourceContent::Page(text) => format!("RECIPE CONTENT: {text}"),
        SourceContent::UrlOnly => format!("RECIPE CONTENT: URL: {url}"),
    }
}

/// Speed table, temperature range, rules and output shape shared by both paths.
#[must_use]
pub fn knowledge_block() -> String {
    let mut out = String::from("TM6 SPEED KNOWLEDGE:\n");
    for speed in &SPEED_TABLE {
        let _ = writeln!(
            out,
            "- {}: {} RPM ({})",
            speed.display_name(),
            format_rpm(speed.rpm),
            speed.purpose
        );
    }

    let _ = write!(
        out,
        "\nTM6 TEMPERATURE RANGE: {MANUAL_TEMP_MIN_C}°C to {MANUAL_TEMP_MAX_C}°C (manual), \
         up to {GUIDED_TEMP_MAX_C}°C (guided cooking only)\n\
         VAROMA TEMPERATURE: ~{VAROMA_TEMP_C}°C for steaming\n\nTM6 KEY RULES:\n"
    );
    for rule in RULES {
        let _ = writeln!(out, "- {rule}");
    }

    let _ = write!(
        out,
        "\nReturn ONLY JSON with this exact structure:\n{OUTPUT_SHAPE}"
    );
    out
}

/// Single-message prompt for providers that cannot retrieve URLs.
#[must_use]
pub fn inline_messages(url: &str, source: &SourceContent) -> Vec<Message> {
    let prompt = format!(
        "You are a Thermomix TM6 expert. Convert this recipe to precise TM6 instructions.\n\n\
         RECIPE URL: {url}\n{}\n\n{}",
        content_section(url, source),
        knowledge_block()
    );
    vec![Message::user(prompt)]
}

/// System knowledge plus a URL-only request for providers that fetch pages themselves.
#[must_use]
pub fn delegated_messages(url: &str) -> Vec<Message> {
    vec![
        Message::system(format!(
            "You are a Thermomix TM6 expert. Convert recipes to precise TM6 instructions.\n\n{}",
            knowledge_block()
        )),
        Message::user(format!(
            "Please fetch the recipe from this URL and convert it to accurate TM6 format: {url}\n\n\
             Extract the recipe content and convert it to Thermomix TM6 instructions with proper \
             speeds, temperatures, and timings."
        )),
    ]
}

fn format_rpm(rpm: u32) -> String {
    if rpm >= 10_000 {
        format!("{},{:03}", rpm / 1000, rpm % 1000)
    } else {
        rpm.to_string()
    }
}
