//! Configuration for the exchange service.
//!
//! This module provides the [`Config`] struct controlling input validation
//! and snapshot persistence for an [`Exchange`](crate::Exchange).

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Default most-urgent rank accepted from requesters
pub const DEFAULT_URGENCY_MIN: u8 = 1;

/// Default least-urgent rank accepted from requesters
pub const DEFAULT_URGENCY_MAX: u8 = 10;

/// Configuration for an [`Exchange`](crate::Exchange)
///
/// # Example
///
/// ```rust
/// use book_exchange::Config;
///
/// let config = Config::new();
///
/// // Persist inventory after every matching run
/// let config = Config::new()
///     .with_snapshot_path("books.txt")
///     .with_autosave(true);
///
/// // Narrower urgency scale
/// let config = Config::new().with_urgency_range(1, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lowest accepted urgency (most urgent)
    urgency_min: u8,

    /// Highest accepted urgency (least urgent)
    urgency_max: u8,

    /// Line-delimited inventory snapshot file
    snapshot_path: Option<PathBuf>,

    /// Save the snapshot after each `process` call
    autosave: bool,
}

impl Config {
    /// Create a configuration with the default 1-10 urgency scale and no persistence
    pub fn new() -> Self {
        Self {
            urgency_min: DEFAULT_URGENCY_MIN,
            urgency_max: DEFAULT_URGENCY_MAX,
            snapshot_path: None,
            autosave: false,
        }
    }

    /// Build a configuration from `BOOK_EXCHANGE_*` environment variables
    ///
    /// - `BOOK_EXCHANGE_SNAPSHOT` - snapshot file path
    /// - `BOOK_EXCHANGE_AUTOSAVE` - `true`/`false`/`1`/`0`
    /// - `BOOK_EXCHANGE_URGENCY_MIN`, `BOOK_EXCHANGE_URGENCY_MAX`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is present but unparsable or the
    /// resulting urgency range is empty.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::new();

        if let Some(path) = lookup("BOOK_EXCHANGE_SNAPSHOT").filter(|p| !p.trim().is_empty()) {
            config.snapshot_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(raw) = lookup("BOOK_EXCHANGE_AUTOSAVE") {
            config.autosave = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(Error::Config(format!(
                        "BOOK_EXCHANGE_AUTOSAVE: expected a boolean, got {other:?}"
                    )))
                }
            };
        }

        if let Some(raw) = lookup("BOOK_EXCHANGE_URGENCY_MIN") {
            config.urgency_min = parse_rank("BOOK_EXCHANGE_URGENCY_MIN", &raw)?;
        }
        if let Some(raw) = lookup("BOOK_EXCHANGE_URGENCY_MAX") {
            config.urgency_max = parse_rank("BOOK_EXCHANGE_URGENCY_MAX", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the accepted urgency range (inclusive)
    #[must_use]
    pub fn with_urgency_range(mut self, min: u8, max: u8) -> Self {
        self.urgency_min = min;
        self.urgency_max = max;
        self
    }

    /// Set the snapshot file used by `save` and `open`
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Save the inventory snapshot after every matching run
    #[must_use]
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Check the configuration for contradictions
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the urgency range is inverted, or if
    /// autosave is enabled without a snapshot path.
    pub fn validate(&self) -> Result<(), Error> {
        if self.urgency_min > self.urgency_max {
            return Err(Error::Config(format!(
                "urgency range {}..={} is empty",
                self.urgency_min, self.urgency_max
            )));
        }
        if self.autosave && self.snapshot_path.is_none() {
            return Err(Error::Config(
                "autosave requires a snapshot path".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the accepted urgency range
    pub fn urgency_range(&self) -> RangeInclusive<u8> {
        self.urgency_min..=self.urgency_max
    }

    /// Get the snapshot path, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Whether `process` saves automatically
    pub fn autosave(&self) -> bool {
        self.autosave
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rank(key: &str, raw: &str) -> Result<u8, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: expected an integer 0-255, got {raw:?}")))
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
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.urgency_range(), 1..=10);
        assert_eq!(config.snapshot_path(), None);
        assert!(!config.autosave());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::new()
            .with_urgency_range(1, 5)
            .with_snapshot_path("books.txt")
            .with_autosave(true);

        assert_eq!(config.urgency_range(), 1..=5);
        assert_eq!(config.snapshot_path(), Some(Path::new("books.txt")));
        assert!(config.autosave());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = Config::new().with_urgency_range(9, 2);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_autosave_without_path_rejected() {
        let config = Config::new().with_autosave(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOOK_EXCHANGE_SNAPSHOT", "/tmp/books.txt"),
            ("BOOK_EXCHANGE_AUTOSAVE", "yes"),
            ("BOOK_EXCHANGE_URGENCY_MAX", "5"),
        ]))
        .unwrap();

        assert_eq!(config.snapshot_path(), Some(Path::new("/tmp/books.txt")));
        assert!(config.autosave());
        assert_eq!(config.urgency_range(), 1..=5);
    }

    #[test]
    fn test_from_lookup_bad_values() {
        let bad_bool = Config::from_lookup(lookup_from(&[("BOOK_EXCHANGE_AUTOSAVE", "maybe")]));
        assert!(matches!(bad_bool, Err(Error::Config(_))));

        let bad_rank = Config::from_lookup(lookup_from(&[("BOOK_EXCHANGE_URGENCY_MIN", "-1")]));
        assert!(matches!(bad_rank, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }
}
