use crate::classify::Outcome;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "phoning-report.toml";

/// Business rules applied when building a report
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Which actors are in scope
    pub scope: ScopeConfig,
    /// How subscriber numbers look inside log text
    pub subscriber: SubscriberConfig,
    /// Unlock classification rules
    pub unlock: UnlockConfig,
    /// PIN reset classification rules
    pub reset: ResetConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Case-insensitive marker a username must contain
    pub actor_marker: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Country code every subscriber number starts with
    pub country_code: String,
    /// Number of digits following the country code
    pub digits: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UnlockConfig {
    /// Actors whose unauthorized unlocks are counted as successful
    pub exception_actors: Vec<String>,
    /// Lock reason to outcome table; reasons missing here are unauthorized
    pub reasons: BTreeMap<String, Outcome>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResetConfig {
    /// Case-sensitive substring marking a successful reset
    pub success_marker: String,
    /// Module left out of the agent summary
    pub excluded_module: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            actor_marker: "WEBC_".to_string(),
        }
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            country_code: "229".to_string(),
            digits: 10,
        }
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        let mut reasons = BTreeMap::new();
        reasons.insert("INVALID PASSWORD".to_string(), Outcome::Success);
        reasons.insert("FAILED TRANSACTION".to_string(), Outcome::Success);
        reasons.insert(String::new(), Outcome::Failure);

        Self {
            exception_actors: vec!["CC_DOPEME_WEBC_EANNE".to_string()],
            reasons,
        }
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            // No leading "S" so both "Successfully" and "successfully" match
            success_marker: "uccessfully".to_string(),
            excluded_module: "RESET MOBILE PASSWORD".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|_| ReportError::ConfigNotFound {
            path: path.as_ref().to_path_buf(),
        })?;

        let config: ReportConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to the built-in rules
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        if path.as_ref().exists() {
            Ok((Self::load_from_file(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scope.actor_marker.trim().is_empty() {
            return Err(ReportError::invalid_config("scope.actor_marker must not be empty"));
        }

        let code = &self.subscriber.country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReportError::invalid_config(format!(
                "subscriber.country_code must contain only digits, got '{code}'"
            )));
        }

        if self.subscriber.digits == 0 || self.subscriber.digits > 20 {
            return Err(ReportError::invalid_config(format!(
                "subscriber.digits must be between 1 and 20, got {}",
                self.subscriber.digits
            )));
        }

        if self.reset.success_marker.is_empty() {
            return Err(ReportError::invalid_config("reset.success_marker must not be empty"));
        }

        Ok(())
    }

    /// Render the configuration as a commented TOML template
    pub fn to_template(&self) -> Result<String> {
        let body = toml::to_string_pretty(self)?;
        Ok(format!(
            "# Phoning report configuration\n\
             # Unlock reasons missing from [unlock.reasons] are reported as unauthorized.\n\n{body}"
        ))
    }
}

/// Write the default configuration template, refusing to clobber an existing file
/// unless `force` is set. Returns whether a file was written.
pub fn write_default_config<P: AsRef<Path>>(path: P, force: bool) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() && !force {
        return Ok(false);
    }

    let template = ReportConfig::default().to_template()?;
    fs::write(path, template)?;
    Ok(true)
}
