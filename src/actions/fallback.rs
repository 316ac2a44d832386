//! Default fallback action.

use async_trait::async_trait;
use serde_json::Value;

use super::Action;
use crate::error::ActionResult;
use crate::tracker::{CollectingDispatcher, Tracker};

pub const FALLBACK_MESSAGE: &str = "I'm sorry, I didn't understand that. Can you please rephrase?";

/// Asks the user to rephrase when nothing else matched.
pub struct DefaultFallbackAction;

#[async_trait]
impl Action for DefaultFallbackAction {
    fn name(&self) -> &'static str {
        "action_default_fallback"
    }

    async fn run(
        &self,
        dispatcher: &mut CollectingDispatcher,
        _tracker: &Tracker,
        _domain: &Value,
    ) -> ActionResult<Vec<Value>> {
        dispatcher.utter_message(FALLBACK_MESSAGE);
        Ok(Vec::new())
    }
}
