//! Custom actions and the name → handler registry
//!
//! The host dialogue server calls actions by name. Each action reads the
//! tracker, may dispatch messages, and returns the events it wants applied
//! to the conversation (always none for the actions defined here).

mod fallback;
mod greeting;
mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ActionError, ActionResult};
use crate::report::ReportPipeline;
use crate::tracker::{CollectingDispatcher, Tracker};

pub use fallback::DefaultFallbackAction;
pub use greeting::HelloWorldAction;
pub use report::{GenerateReportAction, REPORT_FAILURE_MESSAGE, REPORT_SUCCESS_PREFIX};

/// A named conversation action
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        dispatcher: &mut CollectingDispatcher,
        tracker: &Tracker,
        domain: &Value,
    ) -> ActionResult<Vec<Value>>;
}

/// Registry of actions, indexed by name
#[derive(Default, Clone)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback, greeting and report actions.
    pub fn with_defaults(pipeline: ReportPipeline) -> Self {
        let mut registry = Self::new();
        registry.register(DefaultFallbackAction);
        registry.register(HelloWorldAction);
        registry.register(GenerateReportAction::new(pipeline));
        registry
    }

    /// Register an action, replacing any previous action with the same name.
    pub fn register<A: Action + 'static>(&mut self, action: A) {
        let name = action.name();
        if self.actions.insert(name, Arc::new(action)).is_some() {
            debug!(action = name, "Replaced registered action");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Look up and run an action with a fresh dispatcher.
    pub async fn run(
        &self,
        name: &str,
        tracker: &Tracker,
        domain: &Value,
    ) -> ActionResult<(Vec<Value>, CollectingDispatcher)> {
        let action = self
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;

        info!(action = name, sender_id = %tracker.sender_id, "Running action");
        let mut dispatcher = CollectingDispatcher::new();
        let events = action.run(&mut dispatcher, tracker, domain).await?;
        debug!(
            action = name,
            events = events.len(),
            messages = dispatcher.messages().len(),
            "Action finished"
        );
        Ok((events, dispatcher))
    }
}
