//! Welcome banner shown when a chat session starts.

use console::style;

const FEATURES: [&str; 5] = [
    "Stress & anxiety management",
    "Self-care tips",
    "Mindfulness exercises",
    "Daily affirmations for your mood",
    "Voice input from recorded clips",
];

pub fn print_welcome_banner(provider: &str, model: &str, session_id: &str) {
    println!();
    println!("  🧠💙 {}", style("Mindwell").cyan().bold());
    println!(
        "  {}",
        style("A companion for mental health support. Talk about your thoughts and emotions.").dim()
    );
    println!();
    for feature in FEATURES {
        println!("  {} {}", style("✓").green(), feature);
    }
    println!();
    println!("  {}  {} {}", style("Model:").bold(), style(model).dim(), style(format!("({provider})")).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Not a substitute for professional care. In a crisis, contact local emergency services.")
            .yellow()
    );
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!();
}
