use std::time::Duration;

use colorboxd_core::error::ConfigError;
use colorboxd_core::list_length::DEFAULT_MIN_LIST_LENGTH;

/// How long a "list too short" hint stays visible.
const DEFAULT_HINT_DURATION_SECS: u64 = 3;

/// How long a fetched or loaded list survives without activity.
const DEFAULT_LIST_TTL_SECS: u64 = 3600;

/// Tunables for the list menu, cache and reorder session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub min_list_length: u32,
    pub hint_duration: Duration,
    pub list_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_list_length: DEFAULT_MIN_LIST_LENGTH,
            hint_duration: Duration::from_secs(DEFAULT_HINT_DURATION_SECS),
            list_ttl: Duration::from_secs(DEFAULT_LIST_TTL_SECS),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `MIN_LIST_LENGTH`    | `20`    |
    /// | `HINT_DURATION_SECS` | `3`     |
    /// | `LIST_TTL_SECS`      | `3600`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let min_list_length = parse_or(&var, "MIN_LIST_LENGTH", defaults.min_list_length)?;
        let hint_secs = parse_or(&var, "HINT_DURATION_SECS", defaults.hint_duration.as_secs())?;
        let ttl_secs = parse_or(&var, "LIST_TTL_SECS", defaults.list_ttl.as_secs())?;

        Ok(Self {
            min_list_length,
            hint_duration: Duration::from_secs(hint_secs),
            list_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn parse_or<F, T>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected: "a non-negative integer",
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::from_vars(|_| None).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.min_list_length, 20);
        assert_eq!(config.hint_duration, Duration::from_secs(3));
        assert_eq!(config.list_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn overrides() {
        let config = SessionConfig::from_vars(|name| match name {
            "MIN_LIST_LENGTH" => Some("5".into()),
            "LIST_TTL_SECS" => Some("60".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.min_list_length, 5);
        assert_eq!(config.list_ttl, Duration::from_secs(60));
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!(
            SessionConfig::from_vars(|name| (name == "MIN_LIST_LENGTH").then(|| "-1".to_string())),
            Err(ConfigError::Invalid { name: "MIN_LIST_LENGTH", .. })
        );
    }
}
