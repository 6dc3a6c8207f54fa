//! Sectioned `key = value` documents.
//!
//! The format is the one CI scripts read the project's `Cargo.toml` with:
//! `[section]` headers, `key = value` or `key: value` entries, full-line `#`
//! and `;` comments, and indented continuation lines. Keys from the
//! `DEFAULT` section are visible from every other section.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::interpolation;
use crate::{ConfigError, ConfigResult};

/// Section whose keys every other section falls back to.
pub const DEFAULT_SECTION: &str = "DEFAULT";

type Values = BTreeMap<String, String>;

/// A parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    defaults: Values,
    sections: BTreeMap<String, Values>,
}

impl ConfigDocument {
    /// Parse a document from text.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut doc = Self::default();
        let mut current_section: Option<String> = None;
        let mut current_key: Option<String> = None;
        let mut key_indent = 0;
        let mut blank_lines = 0;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();

            // Blank lines only count if a continuation line follows them.
            if trimmed.is_empty() {
                if current_key.is_some() {
                    blank_lines += 1;
                }
                continue;
            }

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = line.len() - line.trim_start().len();
            if indent > key_indent {
                if let (Some(section), Some(key)) = (&current_section, &current_key) {
                    if let Some(value) = doc.values_mut(section).get_mut(key) {
                        for _ in 0..=blank_lines {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                    }
                    blank_lines = 0;
                    continue;
                }
            }
            blank_lines = 0;

            if let Some(name) = section_header(trimmed) {
                // `DEFAULT` may be reopened; duplicate keys are still rejected.
                if name != DEFAULT_SECTION {
                    if doc.sections.contains_key(name) {
                        return Err(duplicate_section(line_no, name));
                    }
                    doc.sections.insert(name.to_string(), Values::new());
                }
                current_section = Some(name.to_string());
                current_key = None;
                continue;
            }

            let Some(section) = &current_section else {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: "entry found before any section header".to_string(),
                });
            };

            let (key, value) = split_entry(trimmed).ok_or_else(|| ConfigError::Parse {
                line: line_no,
                message: format!("expected 'key = value', found '{}'", trimmed),
            })?;

            if key.is_empty() {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }

            let key = key.to_lowercase();
            let values = doc.values_mut(section);
            if values.contains_key(&key) {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: format!("duplicate option '{}' in section '{}'", key, section),
                });
            }
            values.insert(key.clone(), value.to_string());
            current_key = Some(key);
            key_indent = indent;
        }

        Ok(doc)
    }

    /// Names of every section except `DEFAULT`, sorted.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Whether `name` can be looked up. `DEFAULT` always can.
    pub fn has_section(&self, name: &str) -> bool {
        name == DEFAULT_SECTION || self.sections.contains_key(name)
    }

    /// Keys visible from `section`, including inherited `DEFAULT` keys.
    pub fn keys(&self, section: &str) -> ConfigResult<Vec<&str>> {
        let values = self.section(section)?;
        let mut keys: Vec<&str> = values
            .keys()
            .chain(self.defaults.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    /// Value of `key` in `section` exactly as written, without interpolation.
    pub fn raw(&self, section: &str, key: &str) -> ConfigResult<&str> {
        let values = self.section(section)?;
        let key = key.to_lowercase();
        values
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                section: section.to_string(),
                key,
            })
    }

    /// Value of `key` in `section` with `${...}` references resolved.
    pub fn get(&self, section: &str, key: &str) -> ConfigResult<String> {
        let raw = self.raw(section, key)?;
        interpolation::interpolate(self, section, key, raw)
    }

    /// Interpolated value with surrounding double quotes removed.
    ///
    /// This is the lookup CI scripts use: `name = "foo"` yields `foo`.
    pub fn lookup(&self, section: &str, key: &str) -> ConfigResult<String> {
        let value = self.get(section, key)?;
        Ok(value.trim_matches('"').to_string())
    }

    fn section(&self, name: &str) -> ConfigResult<&Values> {
        if name == DEFAULT_SECTION {
            return Ok(&self.defaults);
        }
        self.sections
            .get(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))
    }

    fn values_mut(&mut self, name: &str) -> &mut Values {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }
}

impl FromStr for ConfigDocument {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        Self::parse(s)
    }
}

fn section_header(line: &str) -> Option<&str> {
    if line.len() > 2 && line.starts_with('[') && line.ends_with(']') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let index = line.find(['=', ':'])?;
    Some((line[..index].trim(), line[index + 1..].trim()))
}

fn duplicate_section(line: usize, name: &str) -> ConfigError {
    ConfigError::Parse {
        line,
        message: format!("duplicate section '{}'", name),
    }
}
