//! Comfort score buckets.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Inclusive score range and presentation colours for one comfort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComfortBucket {
    pub min_inclusive: u8,
    pub max_inclusive: u8,
    pub color_key: &'static str,
    pub text_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortLevel {
    Uncomfortable,
    Caution,
    Good,
    Comfortable,
}

impl ComfortLevel {
    /// All levels in ascending score order.
    pub const ASCENDING: [ComfortLevel; 4] = [
        ComfortLevel::Uncomfortable,
        ComfortLevel::Caution,
        ComfortLevel::Good,
        ComfortLevel::Comfortable,
    ];

    pub fn bucket(&self) -> ComfortBucket {
        match self {
            ComfortLevel::Uncomfortable => ComfortBucket {
                min_inclusive: 0,
                max_inclusive: 49,
                color_key: "red",
                text_color: "white",
            },
            ComfortLevel::Caution => ComfortBucket {
                min_inclusive: 50,
                max_inclusive: 79,
                color_key: "yellow",
                text_color: "black",
            },
            ComfortLevel::Good => ComfortBucket {
                min_inclusive: 80,
                max_inclusive: 89,
                color_key: "green",
                text_color: "white",
            },
            ComfortLevel::Comfortable => ComfortBucket {
                min_inclusive: 90,
                max_inclusive: 100,
                color_key: "blue",
                text_color: "white",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComfortLevel::Uncomfortable => "uncomfortable",
            ComfortLevel::Caution => "caution",
            ComfortLevel::Good => "good",
            ComfortLevel::Comfortable => "comfortable",
        }
    }
}

/// Classify a 0-100 score.
///
/// Levels are tested from the lowest upward and a score stays in a level
/// while it is strictly below the next level's minimum, so fractional
/// scores such as 49.5 remain in the lower bucket.
pub fn classify(score: f64) -> Result<ComfortLevel, CoreError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(CoreError::ScoreOutOfRange(score));
    }

    let level = ComfortLevel::ASCENDING
        .windows(2)
        .find(|pair| score < f64::from(pair[1].bucket().min_inclusive))
        .map(|pair| pair[0])
        .unwrap_or(ComfortLevel::Comfortable);
    Ok(level)
}
