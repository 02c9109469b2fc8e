//! Wellness content commands: `mindwell affirmation`, `mindwell moods`,
//! `mindwell sentiment`.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use mindwell_core::sentiment::{LexiconScorer, SentimentLabel, SentimentScorer};
use mindwell_types::wellness::{Mood, QuickPrompt};

/// Affirmation and self-care resources for `mood`, styled for the terminal.
pub fn mood_card_text(mood: Mood) -> String {
    let [first, second] = mood.resources();
    format!(
        "\n  {}  {}\n\n  {} {}\n\n  {}\n  - {first}\n  - {second}\n",
        style("Feeling:").bold(),
        mood.label(),
        style("💬 Affirmation:").cyan().bold(),
        mood.affirmation(),
        style("🗂️ Recommended for you:").bold(),
    )
}

pub fn moods_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Mood").fg(Color::White),
        Cell::new("Affirmation").fg(Color::White),
        Cell::new("Resources").fg(Color::White),
    ]);
    for mood in Mood::ALL {
        table.add_row(vec![
            Cell::new(mood.label()).fg(Color::Cyan),
            Cell::new(mood.affirmation()),
            Cell::new(mood.resources().join("\n")).fg(Color::DarkGrey),
        ]);
    }
    table
}

pub fn quick_prompts_text() -> String {
    let mut text = format!("\n  {}\n", style("💡 Quick questions:").bold());
    for (i, prompt) in QuickPrompt::ALL.iter().enumerate() {
        text.push_str(&format!(
            "  {} {:<24} {}\n",
            style(format!("/quick {}", i + 1)).cyan(),
            prompt.label(),
            style(prompt.message()).dim()
        ));
    }
    text
}

/// `mindwell affirmation <mood>`
pub fn affirmation(mood: Mood, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&mood.card())?);
    } else {
        println!("{}", mood_card_text(mood));
    }
    Ok(())
}

/// `mindwell moods`
pub fn moods(json: bool) -> anyhow::Result<()> {
    if json {
        let cards: Vec<_> = Mood::ALL.iter().map(Mood::card).collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        println!();
        println!("{}", moods_table());
        println!();
    }
    Ok(())
}

/// `mindwell sentiment <text>`
pub fn sentiment(text: &str, json: bool) -> anyhow::Result<()> {
    let score = LexiconScorer.score(text);
    let label = SentimentLabel::from_score(score);

    if json {
        let out = serde_json::json!({ "text": text, "score": score, "label": label });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let styled = match label {
        SentimentLabel::Positive => style(label.to_string()).green(),
        SentimentLabel::Neutral => style(label.to_string()).dim(),
        SentimentLabel::Negative => style(label.to_string()).red(),
    };
    println!();
    println!("  {} {score:+.2} ({styled})", style("Sentiment:").bold());
    println!();
    Ok(())
}
