//! HTML rendering of an emotion report
//!
//! The document is a title block (subject, generation time, dominant
//! emotion) followed by one bar per label in report order. Handlebars
//! escapes the subject and labels.

use chrono::{DateTime, TimeZone};
use handlebars::Handlebars;
use serde::Serialize;

use crate::emotion::EmotionReport;
use crate::error::ActionResult;

const TEMPLATE_NAME: &str = "emotion_report";

/// `HH:MM:SS YYYY-MM-DD`
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %Y-%m-%d";

const REPORT_TEMPLATE: &str = r#"<html>
<head>
    <meta charset="utf-8">
    <style>
        body {
            font-family: "Helvetica", sans-serif;
            font-size: 12px;
        }
        h1 {
            color: #51c054;
        }
        .report-container {
            padding: 2rem;
            margin: 2rem;
            width: 48rem;
            margin-left: auto;
            margin-right: auto;
        }
        .bar-graph {
            display: flex;
            flex-direction: column;
            align-items: start;
            margin-top: 1rem;
        }
        .bar {
            height: 1rem;
            margin-bottom: 0.5rem;
            flex-grow: 1;
            border-radius: 0.5rem;
            background-color: #51c054;
        }
        .row {
            display: flex;
            flex-direction: column;
            gap: 0.25rem;
        }
        .label {
            font-weight: 600;
        }
    </style>
</head>
<body>
    <div class="report-container">
        <div>
            <h1>Emotional Detection Report</h1>
            <p>Name: {{subject}}</p>
            <p>Time: {{generated_at}}</p>
            <p>Dominant Emotion: {{dominant}}</p>
        </div>
        <div class="bar-graph">
            {{#each rows}}
            <div class="row" style="width: 100%">
                <p><span class="label">{{percent}}%</span> - {{label}}</p>
                <div style="width: 100%"><div class="bar" style="width: {{width}}%;"></div></div>
            </div>
            {{/each}}
        </div>
    </div>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    subject: &'a str,
    generated_at: String,
    dominant: &'a str,
    rows: Vec<RowView<'a>>,
}

#[derive(Debug, Serialize)]
struct RowView<'a> {
    label: &'a str,
    percent: i64,
    width: String,
}

/// Compiled report template
pub struct ReportTemplate {
    handlebars: Handlebars<'static>,
}

impl ReportTemplate {
    pub fn new() -> ActionResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render<Tz>(
        &self,
        report: &EmotionReport,
        subject: &str,
        generated_at: &DateTime<Tz>,
    ) -> ActionResult<String>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let view = ReportView {
            subject,
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            dominant: &report.dominant().label,
            rows: report
                .scores()
                .iter()
                .map(|score| RowView {
                    label: &score.label,
                    percent: score.percent(),
                    width: score.width_percent().to_string(),
                })
                .collect(),
        };
        Ok(self.handlebars.render(TEMPLATE_NAME, &view)?)
    }
}
