use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://jsonkeeper.com/b/LLQT";
pub const CURRENT_KEY: &str = "quiz_submissions";
pub const HISTORY_KEY: &str = "quiz_history";

/// Where a quiz document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub current: Source,
    pub history: Source,
    /// Skip TLS certificate verification. Only meant for trusted test hosts.
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

impl PipelineConfig {
    pub fn new(current: &str, history: &str) -> Self {
        Self {
            current: Source::parse(current),
            history: Source::parse(history),
            accept_invalid_certs: false,
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            Source::parse("https://example.com/quiz"),
            Source::Url("https://example.com/quiz".to_string())
        );
        assert_eq!(
            Source::parse(" http://localhost:8080/h "),
            Source::Url("http://localhost:8080/h".to_string())
        );
        assert_eq!(
            Source::parse("data/history.csv"),
            Source::File(PathBuf::from("data/history.csv"))
        );
    }

    #[test]
    fn certificates_are_verified_by_default() {
        let config = PipelineConfig::new(DEFAULT_ENDPOINT, DEFAULT_ENDPOINT);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
