//! Metadata attached to automation-triggered turns.

use serde::{Deserialize, Serialize};

/// A user rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] unless `value` is within `1..=5`.
    pub const fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if value >= Self::MIN && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    /// Returns the rating value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Error returned for ratings outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is outside 1..=5")]
pub struct RatingOutOfRange(pub u8);

/// User feedback on an automation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFeedback {
    /// Optional free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// The rating given.
    pub rating: Rating,
    /// When the feedback was left, epoch millis.
    pub timestamp: i64,
}

/// Metadata carried by automation-triggered turns.
///
/// Serialised with exactly these fields; nothing else is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    /// The automation rule that fired.
    pub rule_id: String,
    /// When the rule fired, epoch millis.
    pub triggered_at: i64,
    /// Feedback the user left on the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<ExecutionFeedback>,
}

impl ExecutionMetadata {
    /// Creates metadata without feedback.
    #[must_use]
    pub fn new(rule_id: impl Into<String>, triggered_at: i64) -> Self {
        Self {
            rule_id: rule_id.into(),
            triggered_at,
            feedback: None,
        }
    }

    /// Records feedback on the run.
    #[must_use]
    pub fn with_feedback(mut self, feedback: ExecutionFeedback) -> Self {
        self.feedback = Some(feedback);
        self
    }
}
