use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::models::{
    PerformanceAnalysis, Submission, SubmissionTable, TopicStats, TrendEntry, REQUIRED_COLUMNS,
};

pub const TREND_WINDOW: usize = 5;

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("missing columns in historical data: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub fn analyze_performance(history: &SubmissionTable) -> Result<PerformanceAnalysis, AnalysisError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !history.has_column(column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns(missing));
    }

    Ok(PerformanceAnalysis {
        topic_stats: topic_stats(&history.rows),
        trend_window: trend_window(&history.rows, TREND_WINDOW),
    })
}

/// Topic label ordering: numeric labels first by value, then text labels
/// alphabetically. Labels of equal value ("1" and "1.0") stay distinct.
#[derive(Debug, PartialEq, Eq)]
struct TopicKey<'a>(&'a str);

impl TopicKey<'_> {
    fn numeric(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|value| !value.is_nan())
    }
}

impl Ord for TopicKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(left), Some(right)) => left.total_cmp(&right).then_with(|| self.0.cmp(other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(other.0),
        }
    }
}

impl PartialOrd for TopicKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rows grouped by topic, in topic order. Rows without a topic belong to no
/// group.
pub fn group_by_topic(rows: &[Submission]) -> Vec<(&str, Vec<&Submission>)> {
    let mut groups: BTreeMap<TopicKey<'_>, Vec<&Submission>> = BTreeMap::new();
    for row in rows {
        if let Some(topic) = row.topic.as_deref() {
            groups.entry(TopicKey(topic)).or_default().push(row);
        }
    }
    groups
        .into_iter()
        .map(|(TopicKey(topic), group)| (topic, group))
        .collect()
}

pub fn topic_stats(rows: &[Submission]) -> Vec<TopicStats> {
    group_by_topic(rows)
        .into_iter()
        .map(|(topic, group)| TopicStats {
            topic: topic.to_string(),
            accuracy: mean(group.iter().filter_map(|row| row.accuracy)),
            difficulty: mean(group.iter().filter_map(|row| row.difficulty)),
            score: mean(group.iter().filter_map(|row| row.score)),
        })
        .collect()
}

/// The `size` most recent rows by raw submission time, newest first. Rows
/// with no time sort last; equal times keep their input order.
pub fn trend_window(rows: &[Submission], size: usize) -> Vec<TrendEntry> {
    let mut ordered: Vec<&Submission> = rows.iter().collect();
    ordered.sort_by(|a, b| match (&a.submission_time, &b.submission_time) {
        (Some(left), Some(right)) => right.cmp(left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ordered
        .into_iter()
        .take(size)
        .map(|row| TrendEntry {
            submission: row.clone(),
            submitted_at: row.submission_time.as_deref().and_then(parse_timestamp),
        })
        .collect()
}

/// Parses the timestamp shapes quiz exports use. Values without an offset
/// are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Arithmetic mean; NaN when there are no values.
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Sample standard deviation (n - 1); NaN below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let avg = mean(values.iter().copied());
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
