//! Emotional wellness report pipeline
//!
//! Straight-line flow, one invocation per finished conversation:
//!
//! 1. collect user messages from the tracker
//! 2. classify them and build the sorted [`EmotionReport`]
//! 3. render the HTML and export it through a [`DocumentRenderer`]
//!
//! Every invocation writes to its own destination, keyed by sender id,
//! timestamp and a random suffix, so concurrent conversations never
//! overwrite each other's document.

pub mod renderer;
pub mod template;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ReportConfig;
use crate::emotion::{self, EmotionClassifier, EmotionReport};
use crate::error::{ActionError, ActionResult};
use crate::tracker::Tracker;

pub use renderer::{resolve_engine, DocumentRenderer, WkhtmltopdfRenderer};
pub use template::ReportTemplate;

/// Outcome of a successful pipeline run
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub subject: String,
    pub report: EmotionReport,
}

impl GeneratedReport {
    pub fn dominant(&self) -> &str {
        &self.report.dominant().label
    }
}

/// Intermediate result: the report and its HTML, not yet exported
#[derive(Debug, Clone)]
pub struct RenderedHtml {
    pub subject: String,
    pub report: EmotionReport,
    pub html: String,
}

pub struct ReportPipeline {
    classifier: Arc<dyn EmotionClassifier>,
    renderer: Arc<dyn DocumentRenderer>,
    template: ReportTemplate,
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        renderer: Arc<dyn DocumentRenderer>,
        config: ReportConfig,
    ) -> ActionResult<Self> {
        Ok(Self {
            classifier,
            renderer,
            template: ReportTemplate::new()?,
            config,
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Subject slot value when set, otherwise the sender id.
    pub fn subject_for(&self, tracker: &Tracker) -> String {
        tracker
            .slot_str(&self.config.subject_slot)
            .map(str::to_string)
            .unwrap_or_else(|| tracker.sender_id.clone())
    }

    /// Collect, classify and template, stopping short of export.
    pub async fn render_html(
        &self,
        tracker: &Tracker,
        now: &DateTime<Local>,
    ) -> ActionResult<RenderedHtml> {
        let messages = tracker.user_messages();
        debug!(
            sender_id = %tracker.sender_id,
            messages = messages.len(),
            "Collected user messages"
        );

        let report =
            emotion::aggregate(self.classifier.as_ref(), &messages, self.config.selection).await?;
        let subject = self.subject_for(tracker);
        let html = self.template.render(&report, &subject, now)?;

        Ok(RenderedHtml {
            subject,
            report,
            html,
        })
    }

    /// Run the whole pipeline and return where the document was written.
    pub async fn generate(&self, tracker: &Tracker) -> ActionResult<GeneratedReport> {
        let now = Local::now();
        let rendered = self.render_html(tracker, &now).await?;

        ensure_output_dir(&self.config.output_dir)?;
        let path = destination_path(&self.config.output_dir, &tracker.sender_id, &now);
        self.renderer.render(&rendered.html, &path).await?;

        info!(
            sender_id = %tracker.sender_id,
            renderer = self.renderer.name(),
            dominant = %rendered.report.dominant().label,
            path = %path.display(),
            "Emotion report generated"
        );
        Ok(GeneratedReport {
            path,
            subject: rendered.subject,
            report: rendered.report,
        })
    }
}

/// Create the output directory if needed and make sure it accepts writes.
pub fn ensure_output_dir(dir: &Path) -> ActionResult<()> {
    let unwritable = |source: std::io::Error| ActionError::DestinationUnwritable {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(unwritable)?;
    let metadata = std::fs::metadata(dir).map_err(unwritable)?;
    if !metadata.is_dir() {
        return Err(unwritable(std::io::Error::new(
            std::io::ErrorKind::Other,
            "not a directory",
        )));
    }
    if metadata.permissions().readonly() {
        return Err(unwritable(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "directory is read-only",
        )));
    }
    Ok(())
}

/// `<dir>/emotion_report_<sender>_<YYYYmmddTHHMMSS>_<8 hex>.pdf`
pub fn destination_path(dir: &Path, sender_id: &str, now: &DateTime<Local>) -> PathBuf {
    let suffix = Uuid::new_v4().simple().to_string();
    dir.join(format!(
        "emotion_report_{}_{}_{}.pdf",
        sanitize_sender(sender_id),
        now.format("%Y%m%dT%H%M%S"),
        &suffix[..8]
    ))
}

fn sanitize_sender(sender_id: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid regex"));
    let cleaned = re.replace_all(sender_id.trim(), "_");
    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned.into_owned()
    }
}
