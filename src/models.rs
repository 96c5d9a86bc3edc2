use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authoring-time difficulty hint. Grouping only; review outcomes never
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Review grade reported by the client.
///
/// Wire format is the ordinal 0-3:
/// 0 - Fail: could not recall the answer.
/// 1 - Hard: recalled with serious difficulty.
/// 2 - Good: recalled with some effort.
/// 3 - Easy: recalled instantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Fail,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub fn from_ordinal(value: u8) -> Option<Grade> {
        match value {
            0 => Some(Grade::Fail),
            1 => Some(Grade::Hard),
            2 => Some(Grade::Good),
            3 => Some(Grade::Easy),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Grade::Fail => 0,
            Grade::Hard => 1,
            Grade::Good => 2,
            Grade::Easy => 3,
        }
    }
}

/// One graded review event, applied to a card's `ReviewState`.
#[derive(Debug, Clone, Copy)]
pub struct ReviewOutcome {
    pub grade: Grade,
    pub reviewed_at: DateTime<Utc>,
}

/// Per-(user, card) scheduling state. Created lazily on the first review
/// and folded forward by the scheduling engine on every outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub card_id: String,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub due_at: DateTime<Utc>,
    pub repetitions: u32,
    pub lapses: u32,
}

impl ReviewState {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

/// Append-only audit record of an accepted review submission.
#[derive(Debug, Clone)]
pub struct ReviewLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub card_id: String,
    pub grade: Grade,
    pub reviewed_at: DateTime<Utc>,
}
