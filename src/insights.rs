use crate::models::{TopicStats, TrendEntry};

pub const WEAK_ACCURACY_THRESHOLD: f64 = 0.6;

/// Topics whose mean accuracy is strictly below the threshold. NaN means
/// never qualify.
pub fn weak_topics(stats: &[TopicStats]) -> Vec<TopicStats> {
    stats
        .iter()
        .filter(|row| row.accuracy < WEAK_ACCURACY_THRESHOLD)
        .cloned()
        .collect()
}

/// Window entries whose accuracy rose over the entry before them in window
/// order (newest first). The first entry has no predecessor.
pub fn improvement_events(window: &[TrendEntry]) -> Vec<TrendEntry> {
    window
        .windows(2)
        .filter_map(|pair| match (pair[0].accuracy(), pair[1].accuracy()) {
            (Some(previous), Some(current)) if current - previous > 0.0 => Some(pair[1].clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Submission;

    fn stats(topic: &str, accuracy: f64) -> TopicStats {
        TopicStats {
            topic: topic.to_string(),
            accuracy,
            difficulty: 1.0,
            score: 10.0,
        }
    }

    fn entry(accuracy: Option<f64>) -> TrendEntry {
        TrendEntry {
            submission: Submission {
                topic: Some("T".to_string()),
                accuracy,
                ..Submission::default()
            },
            submitted_at: None,
        }
    }

    #[test]
    fn weak_threshold_is_strict() {
        let rows = vec![
            stats("A", 0.9),
            stats("B", 0.4),
            stats("Edge", 0.6),
            stats("Blank", f64::NAN),
        ];
        let weak = weak_topics(&rows);
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].topic, "B");
    }

    #[test]
    fn improvements_compare_with_predecessor() {
        let window: Vec<TrendEntry> = [0.2, 0.5, 0.3, 0.3, 0.9]
            .into_iter()
            .map(|accuracy| entry(Some(accuracy)))
            .collect();

        let events = improvement_events(&window);
        let accuracies: Vec<f64> = events.iter().filter_map(TrendEntry::accuracy).collect();
        assert_eq!(accuracies, vec![0.5, 0.9]);
    }

    #[test]
    fn short_windows_have_no_improvements() {
        assert!(improvement_events(&[]).is_empty());
        assert!(improvement_events(&[entry(Some(0.9))]).is_empty());
    }

    #[test]
    fn missing_accuracy_breaks_the_comparison() {
        let window = vec![entry(Some(0.1)), entry(None), entry(Some(0.8))];
        assert!(improvement_events(&window).is_empty());
    }
}
