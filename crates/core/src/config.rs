//! Console configuration (workflow windows, history caps).
//!
//! Every value has a default; environment variables override them:
//!
//! | variable | default |
//! |---|---|
//! | `BILLOPS_REMINDER_WINDOW_DAYS` | 3 |
//! | `BILLOPS_WORKFLOW_HISTORY_LIMIT` | 30 |
//! | `BILLOPS_SETTLEMENT_HISTORY_LIMIT` | 100 |

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const ENV_REMINDER_WINDOW_DAYS: &str = "BILLOPS_REMINDER_WINDOW_DAYS";
pub const ENV_WORKFLOW_HISTORY_LIMIT: &str = "BILLOPS_WORKFLOW_HISTORY_LIMIT";
pub const ENV_SETTLEMENT_HISTORY_LIMIT: &str = "BILLOPS_SETTLEMENT_HISTORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    /// Upper bound (inclusive, in days) of the due-date reminder window.
    pub reminder_window_days: i64,
    /// Maximum number of workflow executions kept in history.
    pub workflow_history_limit: usize,
    /// Maximum number of settlement records kept per invoice.
    pub settlement_history_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            reminder_window_days: 3,
            workflow_history_limit: 30,
            settlement_history_limit: 100,
        }
    }
}

impl ConsoleConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REMINDER_WINDOW_DAYS) {
            let days: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REMINDER_WINDOW_DAYS} must be an integer, got '{raw}'"))?;
            if days < 0 {
                anyhow::bail!("{ENV_REMINDER_WINDOW_DAYS} must not be negative, got {days}");
            }
            config.reminder_window_days = days;
        }

        if let Some(raw) = lookup(ENV_WORKFLOW_HISTORY_LIMIT) {
            config.workflow_history_limit = parse_limit(ENV_WORKFLOW_HISTORY_LIMIT, &raw)?;
        }

        if let Some(raw) = lookup(ENV_SETTLEMENT_HISTORY_LIMIT) {
            config.settlement_history_limit = parse_limit(ENV_SETTLEMENT_HISTORY_LIMIT, &raw)?;
        }

        tracing::debug!(?config, "console configuration loaded");
        Ok(config)
    }

    pub fn with_reminder_window_days(mut self, days: i64) -> Self {
        self.reminder_window_days = days;
        self
    }

    pub fn with_workflow_history_limit(mut self, limit: usize) -> Self {
        self.workflow_history_limit = limit;
        self
    }

    pub fn with_settlement_history_limit(mut self, limit: usize) -> Self {
        self.settlement_history_limit = limit;
        self
    }
}

/// History caps must keep at least one entry.
fn parse_limit(key: &str, raw: &str) -> anyhow::Result<usize> {
    let limit: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer, got '{raw}'"))?;
    if limit == 0 {
        anyhow::bail!("{key} must be a positive integer, got 0");
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ConsoleConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.reminder_window_days, 3);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            (ENV_REMINDER_WINDOW_DAYS, "5"),
            (ENV_WORKFLOW_HISTORY_LIMIT, " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.reminder_window_days, 5);
        assert_eq!(config.workflow_history_limit, 10);
        assert_eq!(config.settlement_history_limit, 100);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = ConsoleConfig::from_lookup(lookup_from(&[(ENV_REMINDER_WINDOW_DAYS, "three")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_REMINDER_WINDOW_DAYS));

        let err = ConsoleConfig::from_lookup(lookup_from(&[(ENV_REMINDER_WINDOW_DAYS, "-1")]))
            .unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn zero_history_limits_are_rejected() {
        for key in [ENV_WORKFLOW_HISTORY_LIMIT, ENV_SETTLEMENT_HISTORY_LIMIT] {
            let err = ConsoleConfig::from_lookup(lookup_from(&[(key, "0")])).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(key));
            assert!(message.contains("positive"));
        }

        let config =
            ConsoleConfig::from_lookup(lookup_from(&[(ENV_SETTLEMENT_HISTORY_LIMIT, "1")])).unwrap();
        assert_eq!(config.settlement_history_limit, 1);
    }
}
