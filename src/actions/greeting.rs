use async_trait::async_trait;
use serde_json::Value;

use super::Action;
use crate::error::ActionResult;
use crate::tracker::{CollectingDispatcher, Tracker};

pub struct HelloWorldAction;

#[async_trait]
impl Action for HelloWorldAction {
    fn name(&self) -> &'static str {
        "action_hello_world"
    }

    async fn run(
        &self,
        dispatcher: &mut CollectingDispatcher,
        _tracker: &Tracker,
        _domain: &Value,
    ) -> ActionResult<Vec<Value>> {
        dispatcher.utter_message("Hello World!");
        Ok(Vec::new())
    }
}
