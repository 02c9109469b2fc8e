//! Static wellness content: moods, daily affirmations, self-care resources,
//! and quick-start prompts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the user says they are feeling today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Tired,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::Anxious, Mood::Tired];

    /// Emoji-prefixed label, e.g. "😰 Anxious".
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "😊 Happy",
            Mood::Sad => "😔 Sad",
            Mood::Angry => "😡 Angry",
            Mood::Anxious => "😰 Anxious",
            Mood::Tired => "😴 Tired",
        }
    }

    pub fn affirmation(&self) -> &'static str {
        match self {
            Mood::Happy => "Keep shining! Your positivity is contagious. 💛",
            Mood::Sad => "You're stronger than you think. This too shall pass. 💙",
            Mood::Angry => "Take a deep breath. You have control over your emotions. 🧘",
            Mood::Anxious => "Focus on the present. One step at a time. 🌿",
            Mood::Tired => "Rest is important. Listen to your body. 😌",
        }
    }

    pub fn resources(&self) -> [&'static str; 2] {
        match self {
            Mood::Happy => [
                "Practice gratitude journaling 📝",
                "Listen to uplifting podcasts 🎧",
            ],
            Mood::Sad => ["Write in a journal 🖊️", "Try a guided meditation 🧘"],
            Mood::Angry => [
                "Do breathing exercises 🌬️",
                "Engage in physical activity 🏃",
            ],
            Mood::Anxious => [
                "Listen to calm music 🎶",
                "Try progressive muscle relaxation 💆",
            ],
            Mood::Tired => ["Drink water & rest 💧", "Do light stretching 🏋️"],
        }
    }

    pub fn card(&self) -> MoodCard {
        MoodCard {
            mood: *self,
            label: self.label().to_string(),
            affirmation: self.affirmation().to_string(),
            resources: self.resources().iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Happy => write!(f, "happy"),
            Mood::Sad => write!(f, "sad"),
            Mood::Angry => write!(f, "angry"),
            Mood::Anxious => write!(f, "anxious"),
            Mood::Tired => write!(f, "tired"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "angry" => Ok(Mood::Angry),
            "anxious" => Ok(Mood::Anxious),
            "tired" => Ok(Mood::Tired),
            other => Err(format!(
                "invalid mood: '{other}' (expected happy, sad, angry, anxious or tired)"
            )),
        }
    }
}

/// Everything shown for one mood, in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCard {
    pub mood: Mood,
    pub label: String,
    pub affirmation: String,
    pub resources: Vec<String>,
}

/// Canned conversation starters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickPrompt {
    StressManagement,
    MindfulnessTips,
    SelfCareAdvice,
}

impl QuickPrompt {
    pub const ALL: [QuickPrompt; 3] = [
        QuickPrompt::StressManagement,
        QuickPrompt::MindfulnessTips,
        QuickPrompt::SelfCareAdvice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuickPrompt::StressManagement => "😌 Stress Management",
            QuickPrompt::MindfulnessTips => "🧘 Mindfulness Tips",
            QuickPrompt::SelfCareAdvice => "💙 Self-care Advice",
        }
    }

    /// The user message sent when this prompt is picked.
    pub fn message(&self) -> &'static str {
        match self {
            QuickPrompt::StressManagement => "What are some effective ways to manage stress?",
            QuickPrompt::MindfulnessTips => {
                "Can you guide me through a simple mindfulness exercise?"
            }
            QuickPrompt::SelfCareAdvice => "What are some self-care tips for mental well-being?",
        }
    }

    /// Look up a prompt by its 1-based menu position.
    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_roundtrip() {
        for mood in Mood::ALL {
            let parsed: Mood = mood.to_string().parse().unwrap();
            assert_eq!(mood, parsed);
        }
    }

    #[test]
    fn test_mood_parse_is_case_insensitive() {
        assert_eq!(" Anxious ".parse::<Mood>().unwrap(), Mood::Anxious);
        assert!("ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn test_every_mood_has_two_resources() {
        for mood in Mood::ALL {
            let card = mood.card();
            assert_eq!(card.resources.len(), 2);
            assert!(!card.affirmation.is_empty());
            assert_eq!(card.label, mood.label());
        }
    }

    #[test]
    fn test_anxious_affirmation() {
        assert_eq!(
            Mood::Anxious.affirmation(),
            "Focus on the present. One step at a time. 🌿"
        );
    }

    #[test]
    fn test_quick_prompt_from_index() {
        assert_eq!(QuickPrompt::from_index(1), Some(QuickPrompt::StressManagement));
        assert_eq!(QuickPrompt::from_index(3), Some(QuickPrompt::SelfCareAdvice));
        assert_eq!(QuickPrompt::from_index(0), None);
        assert_eq!(QuickPrompt::from_index(4), None);
    }
}
