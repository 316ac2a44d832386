//! Classifier seam for emotion scoring

use async_trait::async_trait;

use super::EmotionScore;
use crate::error::{ActionError, ActionResult};

/// Text classifier returning every label's score for each input
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify a batch of texts. The outer vector is parallel to `texts`;
    /// each inner vector covers the model's full label taxonomy, unordered.
    async fn classify(&self, texts: &[String]) -> ActionResult<Vec<Vec<EmotionScore>>>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}

/// Reject responses that cannot back a report: wrong batch size, empty
/// result sets, or scores outside [0, 1].
pub fn validate_batch(expected: usize, results: &[Vec<EmotionScore>]) -> ActionResult<()> {
    if results.len() != expected {
        return Err(ActionError::ClassificationUnavailable(format!(
            "expected {expected} result sets, got {}",
            results.len()
        )));
    }
    for (index, set) in results.iter().enumerate() {
        if set.is_empty() {
            return Err(ActionError::ClassificationUnavailable(format!(
                "empty result set for message {index}"
            )));
        }
        if let Some(bad) = set
            .iter()
            .find(|s| !s.score.is_finite() || !(0.0..=1.0).contains(&s.score))
        {
            return Err(ActionError::ClassificationUnavailable(format!(
                "score {} for label '{}' is out of range",
                bad.score, bad.label
            )));
        }
    }
    Ok(())
}
