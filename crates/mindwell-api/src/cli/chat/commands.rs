//! Slash commands for the chat loop.

use std::path::PathBuf;

use console::style;

use mindwell_types::wellness::{Mood, QuickPrompt};

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Replay the conversation so far.
    History,
    /// Show the affirmation and resources for a mood.
    Mood(Mood),
    /// List moods.
    Moods,
    /// Send a canned question.
    Quick(QuickPrompt),
    /// List quick prompts.
    QuickList,
    /// Transcribe a recorded clip and send it.
    Voice(PathBuf),
    /// Score text without sending it.
    Sentiment(String),
    Clear,
    Exit,
    /// A known command with a bad argument.
    Invalid(String),
    Unknown(String),
}

/// Parse user input as a slash command. `None` if it is not one.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/history" => ChatCommand::History,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/moods" => ChatCommand::Moods,
        "/mood" if arg.is_empty() => ChatCommand::Moods,
        "/mood" => match arg.parse::<Mood>() {
            Ok(mood) => ChatCommand::Mood(mood),
            Err(e) => ChatCommand::Invalid(e),
        },
        "/quick" if arg.is_empty() => ChatCommand::QuickList,
        "/quick" => match arg.parse::<usize>().ok().and_then(QuickPrompt::from_index) {
            Some(prompt) => ChatCommand::Quick(prompt),
            None => ChatCommand::Invalid(format!(
                "/quick takes 1-{}, got '{arg}'",
                QuickPrompt::ALL.len()
            )),
        },
        "/voice" if arg.is_empty() => {
            ChatCommand::Invalid("/voice requires a path to a .wav clip".to_string())
        }
        "/voice" => ChatCommand::Voice(PathBuf::from(arg)),
        "/sentiment" if arg.is_empty() => {
            ChatCommand::Invalid("/sentiment requires some text".to_string())
        }
        "/sentiment" => ChatCommand::Sentiment(arg.to_string()),
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/history", "Show the conversation so far"),
        ("/mood <mood>", "Affirmation and resources (happy, sad, angry, anxious, tired)"),
        ("/quick <1-3>", "Ask a quick question (/quick alone lists them)"),
        ("/voice <clip.wav>", "Send a recorded voice message"),
        ("/sentiment <text>", "Score the mood of some text"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    let mut text = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, help) in rows {
        text.push_str(&format!("  {}{} {help}\n", style(cmd).cyan(), " ".repeat(20 - cmd.len())));
    }
    text.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+D to exit, Ctrl+C is safe (no message loss)").dim()
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/Quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("I feel anxious today"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_parse_mood() {
        assert_eq!(parse("/mood anxious"), Some(ChatCommand::Mood(Mood::Anxious)));
        assert_eq!(parse("/mood  Tired "), Some(ChatCommand::Mood(Mood::Tired)));
        assert_eq!(parse("/mood"), Some(ChatCommand::Moods));
        assert!(matches!(parse("/mood bored"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_quick() {
        assert_eq!(
            parse("/quick 1"),
            Some(ChatCommand::Quick(QuickPrompt::StressManagement))
        );
        assert_eq!(parse("/quick"), Some(ChatCommand::QuickList));
        assert!(matches!(parse("/quick 0"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse("/quick four"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_voice_and_sentiment() {
        assert_eq!(
            parse("/voice clips/morning note.wav"),
            Some(ChatCommand::Voice(PathBuf::from("clips/morning note.wav")))
        );
        assert!(matches!(parse("/voice"), Some(ChatCommand::Invalid(_))));
        assert_eq!(
            parse("/sentiment I am not happy"),
            Some(ChatCommand::Sentiment("I am not happy".to_string()))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = console::strip_ansi_codes(&help_text()).to_string();
        for cmd in ["/help", "/history", "/mood", "/quick", "/voice", "/sentiment", "/clear", "/exit"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/dance now"),
            Some(ChatCommand::Unknown("/dance".to_string()))
        );
    }
}
