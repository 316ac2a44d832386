//! Emotion classification results and aggregation
//!
//! The aggregator sends a conversation's user messages to the classifier in
//! one batch, picks the result set(s) dictated by the [`SelectionStrategy`],
//! and produces an [`EmotionReport`] sorted by score.

pub mod classifier;
pub mod inference;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ActionError, ActionResult};

pub use classifier::EmotionClassifier;
pub use inference::InferenceClassifier;

/// One label/confidence pair returned by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Whole percentage, truncated toward zero (0.873 -> 87).
    pub fn percent(&self) -> i64 {
        (self.score * 100.0) as i64
    }

    /// Score as a percentage of full width, untruncated.
    pub fn width_percent(&self) -> f64 {
        self.score * 100.0
    }
}

/// Scores sorted descending; never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionReport {
    scores: Vec<EmotionScore>,
}

impl EmotionReport {
    /// Sort by score descending, ties broken by label ascending.
    pub fn from_scores(mut scores: Vec<EmotionScore>) -> ActionResult<Self> {
        if scores.is_empty() {
            return Err(ActionError::EmptyReport);
        }
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        Ok(Self { scores })
    }

    pub fn dominant(&self) -> &EmotionScore {
        &self.scores[0]
    }

    pub fn scores(&self) -> &[EmotionScore] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Which message's classification feeds the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// First user message of the conversation
    #[default]
    First,
    /// Most recent user message
    Latest,
    /// Per-label mean across every user message
    Mean,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::First => "first",
            SelectionStrategy::Latest => "latest",
            SelectionStrategy::Mean => "mean",
        }
    }

    fn select(&self, mut results: Vec<Vec<EmotionScore>>) -> Vec<EmotionScore> {
        match self {
            SelectionStrategy::First => results.swap_remove(0),
            SelectionStrategy::Latest => results.pop().unwrap_or_default(),
            SelectionStrategy::Mean => mean_scores(&results),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(SelectionStrategy::First),
            "latest" | "last" => Ok(SelectionStrategy::Latest),
            "mean" | "average" => Ok(SelectionStrategy::Mean),
            other => Err(ActionError::Config(format!(
                "unknown selection strategy '{other}' (expected first, latest or mean)"
            ))),
        }
    }
}

/// Labels missing from a message's result set count as zero.
fn mean_scores(results: &[Vec<EmotionScore>]) -> Vec<EmotionScore> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for set in results {
        for score in set {
            *totals.entry(score.label.as_str()).or_insert(0.0) += score.score;
        }
    }
    let n = results.len().max(1) as f64;
    totals
        .into_iter()
        .map(|(label, total)| EmotionScore::new(label, total / n))
        .collect()
}

/// Classify `messages` in one batch and build the report.
pub async fn aggregate(
    classifier: &dyn EmotionClassifier,
    messages: &[String],
    strategy: SelectionStrategy,
) -> ActionResult<EmotionReport> {
    if messages.is_empty() {
        return Err(ActionError::NoUserMessages);
    }

    debug!(
        model = classifier.model_name(),
        messages = messages.len(),
        strategy = %strategy,
        "Classifying user messages"
    );
    let results = classifier.classify(messages).await?;
    classifier::validate_batch(messages.len(), &results)?;

    let report = EmotionReport::from_scores(strategy.select(results))?;
    info!(
        dominant = %report.dominant().label,
        score = report.dominant().score,
        labels = report.len(),
        "Emotion report assembled"
    );
    Ok(report)
}
