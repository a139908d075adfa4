use crate::analysis::{group_by_topic, mean, sample_std_dev};
use crate::models::{Persona, SubmissionTable};

/// Finds the most consistent and the best-performing topic over the whole
/// history.
///
/// Topics are scanned in topic order (numeric labels by value, then text).
/// NaN deviations and means are skipped and ties go to the first topic
/// scanned. A side with no defined value at all is reported as `None`.
pub fn identify_persona(history: &SubmissionTable) -> Persona {
    if history.is_empty() || !history.has_column("accuracy") {
        return Persona::InsufficientData;
    }

    let groups = group_by_topic(&history.rows);
    if groups.is_empty() {
        return Persona::InsufficientData;
    }

    let mut consistent: Option<(&str, f64)> = None;
    let mut top: Option<(&str, f64)> = None;

    for (topic, rows) in groups {
        let accuracies: Vec<f64> = rows.iter().filter_map(|row| row.accuracy).collect();

        let deviation = sample_std_dev(&accuracies);
        if !deviation.is_nan() && consistent.map_or(true, |(_, best)| deviation < best) {
            consistent = Some((topic, deviation));
        }

        let average = mean(accuracies.iter().copied());
        if !average.is_nan() && top.map_or(true, |(_, best)| average > best) {
            top = Some((topic, average));
        }
    }

    Persona::Profile {
        consistent_topic: consistent.map(|(topic, _)| topic.to_string()),
        top_topic: top.map(|(topic, _)| topic.to_string()),
    }
}
