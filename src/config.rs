//! Runtime configuration
//!
//! Reads config from env vars (a `.env` file is honoured by the binaries):
//!   ACTION_SERVER_BIND_ADDR         — listen address (default: 0.0.0.0:5055)
//!   EMOTION_CLASSIFIER_URL          — classification endpoint
//!   EMOTION_CLASSIFIER_MODEL        — model id (default: SamLowe/roberta-base-go_emotions)
//!   EMOTION_CLASSIFIER_TOKEN        — bearer token (falls back to HF_API_TOKEN)
//!   EMOTION_CLASSIFIER_TIMEOUT_SECS — request timeout (default: 60)
//!   EMOTION_REPORT_OUTPUT_DIR       — where documents are written
//!   EMOTION_REPORT_ENGINE           — wkhtmltopdf executable (falls back to WKHTMLTOPDF_PATH, then PATH)
//!   EMOTION_REPORT_SELECTION        — first | latest | mean (default: first)
//!   EMOTION_REPORT_SUBJECT_SLOT     — slot naming the report subject (default: name)

use std::path::PathBuf;

use crate::emotion::SelectionStrategy;
use crate::error::{ActionError, ActionResult};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5055";
pub const DEFAULT_MODEL: &str = "SamLowe/roberta-base-go_emotions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SUBJECT_SLOT: &str = "name";

/// Classification endpoint settings
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(DEFAULT_MODEL),
            model: DEFAULT_MODEL.to_string(),
            api_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Report generation settings
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Explicit engine location; `None` means search `PATH`.
    pub engine_path: Option<PathBuf>,
    pub selection: SelectionStrategy,
    pub subject_slot: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir().join("emotion_reports"),
            engine_path: None,
            selection: SelectionStrategy::default(),
            subject_slot: DEFAULT_SUBJECT_SLOT.to_string(),
        }
    }
}

/// Everything the action server needs at start-up
#[derive(Debug, Clone)]
pub struct ActionServerConfig {
    pub bind_addr: String,
    pub classifier: ClassifierConfig,
    pub report: ReportConfig,
}

impl Default for ActionServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            classifier: ClassifierConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl ActionServerConfig {
    pub fn from_env() -> ActionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ActionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let model = get("EMOTION_CLASSIFIER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let endpoint = get("EMOTION_CLASSIFIER_URL").unwrap_or_else(|| default_endpoint(&model));
        url::Url::parse(&endpoint).map_err(|e| {
            ActionError::Config(format!("EMOTION_CLASSIFIER_URL '{endpoint}' is invalid: {e}"))
        })?;

        let timeout_seconds = match get("EMOTION_CLASSIFIER_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ActionError::Config(format!(
                    "EMOTION_CLASSIFIER_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let selection = match get("EMOTION_REPORT_SELECTION") {
            Some(raw) => raw.parse()?,
            None => SelectionStrategy::default(),
        };

        Ok(Self {
            bind_addr: get("ACTION_SERVER_BIND_ADDR").unwrap_or(defaults.bind_addr),
            classifier: ClassifierConfig {
                endpoint,
                model,
                api_token: get("EMOTION_CLASSIFIER_TOKEN").or_else(|| get("HF_API_TOKEN")),
                timeout_seconds,
            },
            report: ReportConfig {
                output_dir: get("EMOTION_REPORT_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.report.output_dir),
                engine_path: get("EMOTION_REPORT_ENGINE")
                    .or_else(|| get("WKHTMLTOPDF_PATH"))
                    .map(PathBuf::from),
                selection,
                subject_slot: get("EMOTION_REPORT_SUBJECT_SLOT")
                    .unwrap_or(defaults.report.subject_slot),
            },
        })
    }
}

fn default_endpoint(model: &str) -> String {
    format!("https://api-inference.huggingface.co/models/{model}")
}
