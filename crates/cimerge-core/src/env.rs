//! Environment variable context.
//!
//! Operations never touch the real process environment. They read and write
//! an [`Environment`] value instead, and child processes are spawned with the
//! variables it holds.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use thiserror::Error;
use tracing::debug;

/// Errors raised when reading a variable from an [`Environment`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment variable not set: {0}")]
    NotSet(String),

    #[error("environment variable is not valid unicode: {0}")]
    NotUnicode(String),
}

pub type EnvResult<T> = std::result::Result<T, EnvError>;

/// Variables visible to the current run and to every child process it spawns.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Create an empty environment that inherits nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Get the value of a variable.
    pub fn get_var(&self, name: &str) -> EnvResult<String> {
        let value = self
            .vars
            .get(OsStr::new(name))
            .ok_or_else(|| EnvError::NotSet(name.to_string()))?;

        value
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| EnvError::NotUnicode(name.to_string()))
    }

    /// Set or override a variable.
    ///
    /// Later `get_var` calls and child processes spawned with this context
    /// see the new value.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name: String = name.into();
        let value: String = value.into();
        debug!(name = %name, "Setting environment variable");
        self.vars.insert(OsString::from(name), OsString::from(value));
    }

    /// Remove a variable from the context.
    pub fn remove_var(&mut self, name: &str) -> bool {
        self.vars.remove(OsStr::new(name)).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(OsStr::new(name))
    }

    /// Iterate over every variable, in name order.
    pub fn vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (k, v) in iter {
            env.set_var(k, v);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let mut env = Environment::new();
        env.set_var("CIMERGE_TEST_VAR", "hello");
        assert_eq!(env.get_var("CIMERGE_TEST_VAR").unwrap(), "hello");
    }

    #[test]
    fn test_unset_variable_is_not_found() {
        let env = Environment::new();
        assert_eq!(
            env.get_var("CIMERGE_SURELY_MISSING"),
            Err(EnvError::NotSet("CIMERGE_SURELY_MISSING".to_string()))
        );
    }

    #[test]
    fn test_set_overrides_previous_value() {
        let mut env: Environment = [("GREETING", "hello")].into_iter().collect();
        env.set_var("GREETING", "bye");
        assert_eq!(env.get_var("GREETING").unwrap(), "bye");
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_from_process_captures_path() {
        let env = Environment::from_process();
        if std::env::var_os("PATH").is_some() {
            assert!(env.contains("PATH"));
        }
    }

    #[test]
    fn test_set_does_not_touch_process_environment() {
        let mut env = Environment::from_process();
        env.set_var("CIMERGE_CONTEXT_ONLY_VAR", "1");
        assert!(std::env::var_os("CIMERGE_CONTEXT_ONLY_VAR").is_none());
    }

    #[test]
    fn test_remove_var() {
        let mut env = Environment::new();
        env.set_var("A", "1");
        assert!(env.remove_var("A"));
        assert!(!env.remove_var("A"));
        assert!(env.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_value() {
        use std::os::unix::ffi::OsStringExt;

        let mut env = Environment::new();
        env.vars.insert(
            OsString::from("BROKEN"),
            OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );
        assert_eq!(
            env.get_var("BROKEN"),
            Err(EnvError::NotUnicode("BROKEN".to_string()))
        );
    }
}
