use crate::config::SubscriberConfig;
use crate::error::Result;
use regex::Regex;

/// Delimiter between the log body and the lock reason in unlock logs
pub const REASON_DELIMITER: &str = ": ";

/// Finds subscriber numbers embedded in free-text log lines
#[derive(Debug, Clone)]
pub struct SubscriberExtractor {
    pattern: Regex,
}

impl SubscriberExtractor {
    /// Build an extractor for `<country_code>` followed by exactly `digits` digits,
    /// as a whole token
    pub fn new(country_code: &str, digits: usize) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"\b{}\d{{{}}}\b",
            regex::escape(country_code),
            digits
        ))?;
        Ok(Self { pattern })
    }

    pub fn from_config(config: &SubscriberConfig) -> Result<Self> {
        Self::new(&config.country_code, config.digits)
    }

    /// First subscriber number in `text`, if any
    pub fn extract_subscriber(&self, text: &str) -> Option<String> {
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }

    /// Every subscriber number in `text`, in order of appearance
    pub fn extract_subscribers(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Text after the last `": "`, or the whole text when there is no delimiter
pub fn extract_lock_reason(text: &str) -> &str {
    text.rsplit(REASON_DELIMITER).next().unwrap_or(text)
}
