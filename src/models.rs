use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "topic",
    "accuracy",
    "difficulty",
    "score",
    "submission_time",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Submission {
    pub topic: Option<String>,
    pub accuracy: Option<f64>,
    pub difficulty: Option<f64>,
    pub score: Option<f64>,
    pub submission_time: Option<String>,
}

/// Loaded submissions together with every column name seen in the source
/// records. A column can exist even when some rows carry no value for it.
#[derive(Debug, Clone, Default)]
pub struct SubmissionTable {
    pub columns: BTreeSet<String>,
    pub rows: Vec<Submission>,
}

impl SubmissionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicStats {
    pub topic: String,
    pub accuracy: f64,
    pub difficulty: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendEntry {
    pub submission: Submission,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TrendEntry {
    pub fn accuracy(&self) -> Option<f64> {
        self.submission.accuracy
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceAnalysis {
    pub topic_stats: Vec<TopicStats>,
    pub trend_window: Vec<TrendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Persona {
    Profile {
        consistent_topic: Option<String>,
        top_topic: Option<String>,
    },
    InsufficientData,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Profile {
                consistent_topic,
                top_topic,
            } => write!(
                f,
                "Top Performing Topic: {}, Consistent Topic: {}",
                top_topic.as_deref().unwrap_or("n/a"),
                consistent_topic.as_deref().unwrap_or("n/a")
            ),
            Persona::InsufficientData => {
                write!(f, "Insufficient data to analyze student persona.")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub current_count: usize,
    pub history_count: usize,
    pub topic_stats: Vec<TopicStats>,
    pub trend_window: Vec<TrendEntry>,
    pub weak_topics: Vec<TopicStats>,
    pub improvements: Vec<TrendEntry>,
    pub persona: Persona,
    pub recommendations: Vec<String>,
}
