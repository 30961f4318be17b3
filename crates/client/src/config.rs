use std::path::PathBuf;

pub use colorboxd_core::error::ConfigError;

/// Default HTTP request timeout. Sorting a long list is slow server-side.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default location of the persisted user token.
const DEFAULT_TOKEN_STORE_PATH: &str = ".colorboxd/user_token.json";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth/sort/write functions, always ending in `/`.
    pub backend_url: String,
    /// Base URL of the list-summary function, always ending in `/`.
    pub lists_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Where the user token is persisted between runs.
    pub token_store_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Required | Default                        |
    /// |------------------------|----------|--------------------------------|
    /// | `BACKEND_URL`          | **yes**  | --                             |
    /// | `LISTS_URL`            | no       | value of `BACKEND_URL`         |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `120`                          |
    /// | `TOKEN_STORE_PATH`     | no       | `.colorboxd/user_token.json`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = var("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let backend_url = with_trailing_slash(backend_url.trim());

        let lists_url = var("LISTS_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| with_trailing_slash(v.trim()))
            .unwrap_or_else(|| backend_url.clone());

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                expected: "a valid u64",
                value,
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let token_store_path = var("TOKEN_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_STORE_PATH));

        Ok(Self {
            backend_url,
            lists_url,
            request_timeout_secs,
            token_store_path,
        })
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
