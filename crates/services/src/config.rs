use std::env;
use std::path::{Path, PathBuf};

use quiz_core::ScoringRules;

use crate::error::ConfigError;

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_NAMESPACE: &str = "quiz";
const DEFAULT_GRAND_BADGE: &str = "Quiz Master";

/// Engine settings: where progress lives and how it is scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    db_url: String,
    namespace: String,
    grand_badge: String,
    scoring: ScoringRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            grand_badge: DEFAULT_GRAND_BADGE.to_owned(),
            scoring: ScoringRules::default(),
        }
    }
}

impl EngineConfig {
    /// Read settings from `QUIZ_DB_URL`, `QUIZ_NAMESPACE`, `QUIZ_GRAND_BADGE`,
    /// `QUIZ_PASS_POINTS` and `QUIZ_FAIL_POINTS`, using defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("QUIZ_DB_URL") {
            config = config.with_db_url(raw)?;
        }
        if let Some(raw) = lookup("QUIZ_NAMESPACE") {
            config = config.with_namespace(raw)?;
        }
        if let Some(raw) = lookup("QUIZ_GRAND_BADGE") {
            config = config.with_grand_badge(raw)?;
        }

        let pass = parse_points(&lookup, "QUIZ_PASS_POINTS")?;
        let fail = parse_points(&lookup, "QUIZ_FAIL_POINTS")?;
        if pass.is_some() || fail.is_some() {
            let defaults = config.scoring;
            config.scoring = ScoringRules::new(
                pass.unwrap_or(defaults.pass_points()),
                fail.unwrap_or(defaults.fail_points()),
            );
        }

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Empty` for a blank URL.
    pub fn with_db_url(mut self, raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty { name: "QUIZ_DB_URL" });
        }
        self.db_url = normalize_sqlite_url(&raw);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Empty` for a blank namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let namespace = namespace.into().trim().to_owned();
        if namespace.is_empty() {
            return Err(ConfigError::Empty {
                name: "QUIZ_NAMESPACE",
            });
        }
        self.namespace = namespace;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Empty` for a blank badge name.
    pub fn with_grand_badge(mut self, badge: impl Into<String>) -> Result<Self, ConfigError> {
        let badge = badge.into().trim().to_owned();
        if badge.is_empty() {
            return Err(ConfigError::Empty {
                name: "QUIZ_GRAND_BADGE",
            });
        }
        self.grand_badge = badge;
        Ok(self)
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn grand_badge(&self) -> &str {
        &self.grand_badge
    }

    #[must_use]
    pub fn scoring(&self) -> ScoringRules {
        self.scoring
    }

    /// Storage key of the progress record.
    #[must_use]
    pub fn progress_key(&self) -> String {
        format!("{}:progress", self.namespace)
    }

    /// Storage key of the completion counters.
    #[must_use]
    pub fn completions_key(&self) -> String {
        format!("{}:completions", self.namespace)
    }
}

fn parse_points(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u32>, ConfigError> {
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber { name, raw })
        })
        .transpose()
}

/// Turn bare paths into absolute `sqlite://` URLs; URLs pass through untouched.
fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.progress_key(), "quiz:progress");
        assert_eq!(config.completions_key(), "quiz:completions");
        assert_eq!(config.scoring(), ScoringRules::new(20, 15));
    }

    #[test]
    fn reads_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("QUIZ_DB_URL", "sqlite::memory:"),
            ("QUIZ_NAMESPACE", "rust-course"),
            ("QUIZ_GRAND_BADGE", "Ferris"),
            ("QUIZ_PASS_POINTS", "25"),
        ]))
        .unwrap();
        assert_eq!(config.db_url(), "sqlite::memory:");
        assert_eq!(config.progress_key(), "rust-course:progress");
        assert_eq!(config.grand_badge(), "Ferris");
        assert_eq!(config.scoring(), ScoringRules::new(25, 15));
    }

    #[test]
    fn rejects_bad_points() {
        let err = EngineConfig::from_lookup(lookup(&[("QUIZ_FAIL_POINTS", "lots")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { name: "QUIZ_FAIL_POINTS", .. }
        ));
    }

    #[test]
    fn rejects_blank_namespace() {
        assert!(EngineConfig::default().with_namespace("  ").is_err());
    }

    #[test]
    fn bare_paths_become_sqlite_urls() {
        assert_eq!(normalize_sqlite_url("/tmp/quiz.db"), "sqlite:///tmp/quiz.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/quiz.db"), "sqlite:///tmp/quiz.db");
        assert_eq!(normalize_sqlite_url("sqlite://x.db"), "sqlite://x.db");
        assert!(normalize_sqlite_url("quiz.db").starts_with("sqlite://"));
    }
}
