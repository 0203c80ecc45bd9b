//! Error types for the planner core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid {axis} value '{value}' on search result {place_id}")]
    InvalidCoordinate {
        place_id: String,
        axis: &'static str,
        value: String,
    },

    #[error("Comfort score {0} is outside 0-100")]
    ScoreOutOfRange(f64),
}
