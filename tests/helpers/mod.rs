//! Stub classifier and renderer shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use emotion_actions::config::ReportConfig;
use emotion_actions::report::ReportPipeline;
use emotion_actions::{
    ActionError, ActionResult, DocumentRenderer, EmotionClassifier, EmotionScore,
    SelectionStrategy, Tracker, TrackerEvent,
};
use tempfile::TempDir;

/// Returns canned score sets: the i-th input gets `responses[i % len]`.
pub struct StubClassifier {
    responses: Vec<Vec<EmotionScore>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<String>>>,
}

impl StubClassifier {
    pub fn new(responses: Vec<Vec<EmotionScore>>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmotionClassifier for StubClassifier {
    async fn classify(&self, texts: &[String]) -> ActionResult<Vec<Vec<EmotionScore>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(texts.to_vec());
        Ok((0..texts.len())
            .map(|i| self.responses[i % self.responses.len()].clone())
            .collect())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Always fails, as if the endpoint were down.
pub struct DownClassifier;

#[async_trait]
impl EmotionClassifier for DownClassifier {
    async fn classify(&self, _texts: &[String]) -> ActionResult<Vec<Vec<EmotionScore>>> {
        Err(ActionError::ClassificationUnavailable(
            "connection refused".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        "down"
    }
}

/// Writes the HTML verbatim to the destination.
pub struct HtmlFileRenderer;

#[async_trait]
impl DocumentRenderer for HtmlFileRenderer {
    async fn render(&self, html: &str, destination: &Path) -> ActionResult<()> {
        tokio::fs::write(destination, html)
            .await
            .map_err(|e| ActionError::RenderFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "html-file"
    }
}

pub struct FailingRenderer;

#[async_trait]
impl DocumentRenderer for FailingRenderer {
    async fn render(&self, _html: &str, _destination: &Path) -> ActionResult<()> {
        Err(ActionError::RenderFailed("engine crashed".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn joy_scores() -> Vec<EmotionScore> {
    vec![
        EmotionScore::new("sadness", 0.02),
        EmotionScore::new("joy", 0.95),
        EmotionScore::new("anger", 0.01),
        EmotionScore::new("neutral", 0.02),
    ]
}

pub fn report_config(dir: &TempDir, selection: SelectionStrategy) -> ReportConfig {
    ReportConfig {
        output_dir: dir.path().join("reports"),
        engine_path: None,
        selection,
        subject_slot: "name".to_string(),
    }
}

pub fn pipeline(
    classifier: Arc<dyn EmotionClassifier>,
    renderer: Arc<dyn DocumentRenderer>,
    config: ReportConfig,
) -> ReportPipeline {
    ReportPipeline::new(classifier, renderer, config).unwrap()
}

pub fn conversation(sender_id: &str, user_texts: &[&str]) -> Tracker {
    let mut events = Vec::new();
    for text in user_texts {
        events.push(TrackerEvent::user(*text));
        events.push(TrackerEvent::bot("noted"));
    }
    Tracker::new(sender_id).with_events(events)
}
