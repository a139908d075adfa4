use crate::models::{Persona, TopicStats};

const NO_WEAK_TOPICS: &str = "No weak topics identified. Keep up the good work!";
const PERSONA_UNAVAILABLE: &str = "Unable to analyze persona due to insufficient data.";
const NO_TOP_TOPIC: &str =
    "Leverage your strongest topic to build confidence once more accuracy data is recorded.";
const NO_CONSISTENT_TOPIC: &str =
    "Maintain consistency by attempting topics more than once so progress can be measured.";

pub fn generate_recommendations(weak_topics: &[TopicStats], persona: &Persona) -> Vec<String> {
    let mut recommendations = Vec::new();

    if weak_topics.is_empty() {
        recommendations.push(NO_WEAK_TOPICS.to_string());
    } else {
        for row in weak_topics {
            recommendations.push(format!(
                "Focus on the topic '{}' with an accuracy of {:.2}.",
                row.topic, row.accuracy
            ));
        }
    }

    match persona {
        Persona::Profile {
            consistent_topic,
            top_topic,
        } => {
            recommendations.push(match top_topic {
                Some(topic) => format!("Leverage your strength in '{topic}' to build confidence."),
                None => NO_TOP_TOPIC.to_string(),
            });
            recommendations.push(match consistent_topic {
                Some(topic) => format!("Maintain consistency in '{topic}'."),
                None => NO_CONSISTENT_TOPIC.to_string(),
            });
        }
        Persona::InsufficientData => recommendations.push(PERSONA_UNAVAILABLE.to_string()),
    }

    recommendations
}
