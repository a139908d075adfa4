use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::{analyze_performance, AnalysisError};
use crate::config::{PipelineConfig, CURRENT_KEY, HISTORY_KEY};
use crate::fetch::Fetcher;
use crate::insights::{improvement_events, weak_topics};
use crate::loader::load_table;
use crate::models::InsightReport;
use crate::persona::identify_persona;
use crate::recommend::generate_recommendations;
use crate::validate::{validate_document, KeyCheck};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    EmptyDataset,
    MissingColumns(Vec<String>),
    NoTopicStatistics,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::EmptyDataset => {
                write!(f, "One or both datasets are empty. Exiting the program.")
            }
            HaltReason::MissingColumns(columns) => write!(
                f,
                "Missing columns in historical data: {}. No data available for topic performance analysis.",
                columns.join(", ")
            ),
            HaltReason::NoTopicStatistics => {
                write!(f, "No data available for topic performance analysis.")
            }
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Completed(Box<InsightReport>),
    Halted(HaltReason),
}

#[derive(Debug)]
pub struct PipelineReport {
    pub checks: Vec<KeyCheck>,
    pub outcome: Outcome,
}

/// Fetches both documents and runs every stage. Fetch failures are logged and
/// the document is treated as absent.
pub async fn run(config: &PipelineConfig) -> anyhow::Result<PipelineReport> {
    let fetcher = Fetcher::new(config.timeout, config.accept_invalid_certs)?;

    let current = match fetcher.fetch(&config.current, CURRENT_KEY).await {
        Ok(document) => Some(document),
        Err(err) => {
            warn!(source = %config.current, error = %err, "failed to fetch current submissions");
            None
        }
    };
    let history = match fetcher.fetch(&config.history, HISTORY_KEY).await {
        Ok(document) => Some(document),
        Err(err) => {
            warn!(source = %config.history, error = %err, "failed to fetch quiz history");
            None
        }
    };

    Ok(process(current.as_ref(), history.as_ref()))
}

/// The pure half of the pipeline: validation through recommendations.
pub fn process(current: Option<&Value>, history: Option<&Value>) -> PipelineReport {
    let mut checks = validate_document(current, &[CURRENT_KEY]);
    checks.extend(validate_document(history, &[HISTORY_KEY]));

    let current_table = load_table(current, CURRENT_KEY);
    let history_table = load_table(history, HISTORY_KEY);

    if current_table.is_empty() || history_table.is_empty() {
        return halted(checks, HaltReason::EmptyDataset);
    }

    let analysis = match analyze_performance(&history_table) {
        Ok(analysis) => analysis,
        Err(AnalysisError::MissingColumns(columns)) => {
            return halted(checks, HaltReason::MissingColumns(columns));
        }
    };
    if analysis.topic_stats.is_empty() {
        return halted(checks, HaltReason::NoTopicStatistics);
    }

    let weak = weak_topics(&analysis.topic_stats);
    let improvements = improvement_events(&analysis.trend_window);
    let persona = identify_persona(&history_table);
    let recommendations = generate_recommendations(&weak, &persona);

    info!(
        topics = analysis.topic_stats.len(),
        weak = weak.len(),
        improvements = improvements.len(),
        "analysis complete"
    );

    PipelineReport {
        checks,
        outcome: Outcome::Completed(Box::new(InsightReport {
            current_count: current_table.len(),
            history_count: history_table.len(),
            topic_stats: analysis.topic_stats,
            trend_window: analysis.trend_window,
            weak_topics: weak,
            improvements,
            persona,
            recommendations,
        })),
    }
}

fn halted(checks: Vec<KeyCheck>, reason: HaltReason) -> PipelineReport {
    warn!(%reason, "pipeline halted");
    PipelineReport {
        checks,
        outcome: Outcome::Halted(reason),
    }
}
