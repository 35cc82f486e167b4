use crate::config::ReportConfig;
use crate::error::Result;
use crate::extract::{extract_lock_reason, SubscriberExtractor};
use crate::record::{ResetRecord, UnlockRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Result of one logged operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    Unauthorized,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failure => write!(f, "FAILURE"),
            Outcome::Unauthorized => write!(f, "UNAUTHORIZED"),
        }
    }
}

/// Unlock record with its derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedUnlock {
    pub username: String,
    pub subscriber_id: Option<String>,
    pub lock_reason: String,
    pub outcome: Outcome,
    /// More than one subscriber number appeared in the log text
    pub ambiguous_subscriber: bool,
}

/// Reset record with its derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedReset {
    pub username: String,
    pub module: String,
    pub subscriber_id: Option<String>,
    pub outcome: Outcome,
    pub ambiguous_subscriber: bool,
}

/// Compiled form of [`ReportConfig`]
#[derive(Debug, Clone)]
pub struct Rules {
    actor_marker: String,
    extractor: SubscriberExtractor,
    reasons: BTreeMap<String, Outcome>,
    exception_actors: HashSet<String>,
    success_marker: String,
    excluded_module: String,
}

impl Rules {
    pub fn from_config(config: &ReportConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            actor_marker: config.scope.actor_marker.to_uppercase(),
            extractor: SubscriberExtractor::from_config(&config.subscriber)?,
            reasons: config.unlock.reasons.clone(),
            exception_actors: config.unlock.exception_actors.iter().cloned().collect(),
            success_marker: config.reset.success_marker.clone(),
            excluded_module: config.reset.excluded_module.clone(),
        })
    }

    pub fn extractor(&self) -> &SubscriberExtractor {
        &self.extractor
    }

    pub fn excluded_module(&self) -> &str {
        &self.excluded_module
    }

    /// Whether the actor belongs to the reported channel
    pub fn in_scope(&self, username: &str) -> bool {
        !username.is_empty() && username.to_uppercase().contains(&self.actor_marker)
    }

    /// Whether a lock reason has an entry in the reason table
    pub fn is_known_reason(&self, reason: &str) -> bool {
        self.reasons.contains_key(reason)
    }

    pub fn is_exception_actor(&self, username: &str) -> bool {
        self.exception_actors.contains(username)
    }

    /// Outcome of an unlock, including the exception actor override
    pub fn unlock_outcome(&self, username: &str, lock_reason: &str) -> Outcome {
        let outcome = self
            .reasons
            .get(lock_reason)
            .copied()
            .unwrap_or(Outcome::Unauthorized);

        if outcome == Outcome::Unauthorized && self.is_exception_actor(username) {
            Outcome::Success
        } else {
            outcome
        }
    }

    pub fn reset_outcome(&self, log: &str) -> Outcome {
        if log.contains(&self.success_marker) {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn classify_unlock(&self, record: &UnlockRecord) -> ClassifiedUnlock {
        let subscribers = self.extractor.extract_subscribers(&record.log);
        let lock_reason = extract_lock_reason(&record.log).to_string();
        let outcome = self.unlock_outcome(&record.username, &lock_reason);

        ClassifiedUnlock {
            username: record.username.clone(),
            ambiguous_subscriber: subscribers.len() > 1,
            subscriber_id: subscribers.into_iter().next(),
            lock_reason,
            outcome,
        }
    }

    pub fn classify_reset(&self, record: &ResetRecord) -> ClassifiedReset {
        let subscribers = self.extractor.extract_subscribers(&record.log);

        ClassifiedReset {
            username: record.username.clone(),
            module: record.module.clone(),
            ambiguous_subscriber: subscribers.len() > 1,
            subscriber_id: subscribers.into_iter().next(),
            outcome: self.reset_outcome(&record.log),
        }
    }
}
