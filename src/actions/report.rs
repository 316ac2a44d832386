//! End-of-conversation emotional wellness report.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::Action;
use crate::error::ActionResult;
use crate::report::ReportPipeline;
use crate::tracker::{CollectingDispatcher, Tracker};

pub const REPORT_SUCCESS_PREFIX: &str = "Bye bye! If you ever need assistance, I'll be here. Also, here is a report on your emotional wellness:";

pub const REPORT_FAILURE_MESSAGE: &str = "Bye bye! If you ever need assistance, I'll be here. Unfortunately, I couldn't prepare your emotional wellness report this time.";

/// Generates the report and tells the user where it was written.
///
/// Pipeline failures never escape: they are logged and answered with
/// [`REPORT_FAILURE_MESSAGE`]. The success message is only sent once the
/// document exists.
pub struct GenerateReportAction {
    pipeline: ReportPipeline,
}

impl GenerateReportAction {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Action for GenerateReportAction {
    fn name(&self) -> &'static str {
        "action_generate_report"
    }

    async fn run(
        &self,
        dispatcher: &mut CollectingDispatcher,
        tracker: &Tracker,
        _domain: &Value,
    ) -> ActionResult<Vec<Value>> {
        match self.pipeline.generate(tracker).await {
            Ok(generated) => {
                dispatcher.utter_message(format!(
                    "{REPORT_SUCCESS_PREFIX}\n{}",
                    generated.path.display()
                ));
            }
            Err(e) => {
                warn!(
                    sender_id = %tracker.sender_id,
                    code = e.code(),
                    "Emotion report failed: {e}"
                );
                dispatcher.utter_message(REPORT_FAILURE_MESSAGE);
            }
        }
        Ok(Vec::new())
    }
}
