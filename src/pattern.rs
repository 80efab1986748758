//! Schema name filtering
//!
//! Patterns select which schemas to download. Each pattern must match the
//! whole short name of a schema. A pattern may carry a version, in which
//! case the schema is fetched as `{short_name}@{version}`. Patterns are
//! checked in order and the first match wins; an empty pattern table
//! matches every schema.

use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::schema::{short_name, Schema};

/// A compiled schema-name pattern
#[derive(Debug, Clone)]
pub struct SchemaPattern {
    source: String,
    regex: Regex,
}

impl SchemaPattern {
    /// Compile a pattern that must match the whole input
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as the user wrote it
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl fmt::Display for SchemaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A pattern with the version it pins, if any
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub pattern: SchemaPattern,
    pub version: Option<String>,
}

impl PatternEntry {
    pub fn new(pattern: SchemaPattern, version: Option<String>) -> Self {
        Self { pattern, version }
    }

    fn alias(&self, short_name: &str) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", short_name, version),
            None => short_name.to_string(),
        }
    }
}

/// Builds pattern tables from raw configuration values
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternFactory;

impl PatternFactory {
    pub fn new() -> Self {
        Self
    }

    /// Compile patterns in order, failing on the first invalid one
    pub fn compile(&self, patterns: &[String]) -> Result<Vec<SchemaPattern>> {
        patterns
            .iter()
            .map(|raw| {
                let pattern = SchemaPattern::new(raw)?;
                debug!(pattern = %pattern, "compiled schema pattern");
                Ok(pattern)
            })
            .collect()
    }

    /// Compile patterns and pair them with versions by position.
    ///
    /// `versions` that are absent or empty pin nothing. Otherwise there must
    /// be exactly one version per pattern; a blank version leaves its
    /// pattern unpinned.
    pub fn matcher(
        &self,
        patterns: &[String],
        versions: Option<&[String]>,
    ) -> Result<PatternMatcher> {
        let compiled = self.compile(patterns)?;

        let entries = match versions {
            Some(versions) if !versions.is_empty() => {
                if versions.len() != compiled.len() {
                    return Err(SchemaError::PatternVersionMismatch {
                        patterns: compiled.len(),
                        versions: versions.len(),
                    });
                }
                compiled
                    .into_iter()
                    .zip(versions.iter())
                    .map(|(pattern, version)| {
                        let version = version.trim();
                        let version = (!version.is_empty()).then(|| version.to_string());
                        PatternEntry::new(pattern, version)
                    })
                    .collect()
            }
            _ => compiled
                .into_iter()
                .map(|pattern| PatternEntry::new(pattern, None))
                .collect(),
        };

        Ok(PatternMatcher::from_entries(entries))
    }
}

/// Ordered, immutable pattern table
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    entries: Vec<PatternEntry>,
}

impl PatternMatcher {
    pub fn from_entries(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Alias to fetch `schema` by, or `None` if it is filtered out
    pub fn matches(&self, schema: &Schema) -> Option<String> {
        self.matches_name(&schema.name)
    }

    /// Same as [`matches`](Self::matches) for a raw (possibly qualified) name
    pub fn matches_name(&self, name: &str) -> Option<String> {
        let short = short_name(name);

        if self.entries.is_empty() {
            return Some(short.to_string());
        }

        let found = self
            .entries
            .iter()
            .find(|entry| entry.pattern.is_match(short))
            .map(|entry| entry.alias(short));

        match &found {
            Some(alias) => debug!(schema = short, alias = %alias, "schema matched"),
            None => debug!(schema = short, "schema matched no pattern"),
        }
        found
    }
}
