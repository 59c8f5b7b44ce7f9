//! Environment lookups shared by the service binaries.
//!
//! Each binary's `*Config::from_env` delegates to a `from_lookup` taking a
//! [`Lookup`], so parsing is testable without touching the process
//! environment.

use std::fmt::Display;
use std::str::FromStr;

/// Resolves a variable name to its value, `None` when unset.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// [`Lookup`] over the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name}='{value}' is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Value of `name`, or `default` when unset.
pub fn string_or(lookup: Lookup<'_>, name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

/// Value of `name` (or `default`), rejecting an empty string.
pub fn non_empty_or(
    lookup: Lookup<'_>,
    name: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    let value = string_or(lookup, name, default);
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value)
}

/// Parse `name` as `T`, or use `default` when unset.
pub fn parse_or<T>(lookup: Lookup<'_>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// Comma-separated broker list. Blank entries are dropped; an empty result
/// is an error.
pub fn broker_list(
    lookup: Lookup<'_>,
    name: &'static str,
    default: &str,
) -> Result<Vec<String>, ConfigError> {
    let brokers: Vec<String> = string_or(lookup, name, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if brokers.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(brokers)
}
