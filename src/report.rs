use std::fmt::Write;

use serde_json::{json, Value};

use crate::models::{InsightReport, TrendEntry};
use crate::pipeline::{Outcome, PipelineReport};

pub fn render_recommendations(recommendations: &[String]) -> String {
    let mut output = String::new();
    let _ = writeln!(output);
    let _ = writeln!(output, "Personalized Recommendations:");
    for recommendation in recommendations {
        let _ = writeln!(output, "- {recommendation}");
    }
    output
}

/// Console lines for a whole run: validation results, then either the halt
/// message or the recommendations block.
pub fn render_console(report: &PipelineReport) -> String {
    let mut output = String::new();
    for check in &report.checks {
        let _ = writeln!(output, "{}", check.message());
    }

    match &report.outcome {
        Outcome::Halted(reason) => {
            let _ = writeln!(output, "Error: {reason}");
        }
        Outcome::Completed(insights) => {
            output.push_str(&render_recommendations(&insights.recommendations));
        }
    }

    output
}

/// The whole run as JSON: key checks plus either the insight report fields
/// or the halt reason.
pub fn render_json(report: &PipelineReport) -> serde_json::Result<Value> {
    let mut value = match &report.outcome {
        Outcome::Completed(insights) => serde_json::to_value(insights)?,
        Outcome::Halted(reason) => json!({ "halted": reason.to_string() }),
    };
    if let Value::Object(fields) = &mut value {
        fields.insert("checks".to_string(), serde_json::to_value(&report.checks)?);
    }
    Ok(value)
}

pub fn build_report(insights: &InsightReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Quiz Performance Report");
    let _ = writeln!(
        output,
        "Generated from {} historical and {} current submissions",
        insights.history_count, insights.current_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Topic Performance");
    let _ = writeln!(output, "| Topic | Accuracy | Difficulty | Score |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for stats in &insights.topic_stats {
        let _ = writeln!(
            output,
            "| {} | {:.2} | {:.2} | {:.2} |",
            stats.topic, stats.accuracy, stats.difficulty, stats.score
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weak Topics");
    if insights.weak_topics.is_empty() {
        let _ = writeln!(output, "No topics below the accuracy threshold.");
    } else {
        for stats in &insights.weak_topics {
            let _ = writeln!(output, "- {} (accuracy {:.2})", stats.topic, stats.accuracy);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Submissions");
    if insights.trend_window.is_empty() {
        let _ = writeln!(output, "No recent submissions.");
    } else {
        for entry in &insights.trend_window {
            let _ = writeln!(output, "- {}", describe_entry(entry));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Improvements");
    if insights.improvements.is_empty() {
        let _ = writeln!(output, "No accuracy gains between recent submissions.");
    } else {
        for entry in &insights.improvements {
            let _ = writeln!(output, "- {}", describe_entry(entry));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Persona");
    let _ = writeln!(output, "{}", insights.persona);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for recommendation in &insights.recommendations {
        let _ = writeln!(output, "- {recommendation}");
    }

    output
}

fn describe_entry(entry: &TrendEntry) -> String {
    let when = entry
        .submitted_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    let accuracy = entry
        .accuracy()
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "{} on {}: accuracy {}",
        entry.submission.topic.as_deref().unwrap_or("untitled"),
        when,
        accuracy
    )
}
