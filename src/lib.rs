//! Custom conversation actions
//!
//! A fallback responder, a greeting responder, and an end-of-conversation
//! report that classifies the emotional tone of the user's messages and
//! renders it as a PDF. Actions are registered by name in an
//! [`actions::ActionRegistry`] and served to the host dialogue server over
//! the webhook in [`server`] (feature `server`).

pub mod actions;
pub mod config;
pub mod emotion;
pub mod error;
pub mod report;
pub mod tracker;

#[cfg(feature = "server")]
pub mod server;

pub use actions::{Action, ActionRegistry};
pub use config::{ActionServerConfig, ClassifierConfig, ReportConfig};
pub use emotion::{EmotionClassifier, EmotionReport, EmotionScore, SelectionStrategy};
pub use error::{ActionError, ActionResult};
pub use report::{DocumentRenderer, GeneratedReport, ReportPipeline};
pub use tracker::{BotMessage, CollectingDispatcher, Tracker, TrackerEvent};
