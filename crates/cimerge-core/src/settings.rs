//! Merge workflow settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::env::Environment;
use crate::{Error, Result};

/// Branch whose commits get merged.
pub const BRANCH_TO_MERGE: &str = "staging";
/// Branch receiving the merge.
pub const BRANCH_TO_MERGE_INTO: &str = "master";
pub const REMOTE_URL: &str = "https://github.com/";
/// Package configuration file read for name and version.
pub const CONFIGURATION_FILE: &str = "Cargo.toml";
pub const VERSION_PREFIX: &str = "";
/// Variable holding the token used to push to the remote host.
pub const TOKEN_VARIABLE: &str = "GITHUB_TOKEN";

/// Everything the merge workflow needs besides the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSettings {
    pub branch_to_merge: String,
    pub branch_to_merge_into: String,
    /// Base URL of the remote host, e.g. `https://github.com/`.
    pub remote_url: String,
    /// Repository path relative to `remote_url`, e.g. `owner/project.git`.
    pub repository: String,
    pub git_username: String,
    pub git_email: String,
    pub configuration_file: PathBuf,
    pub version_prefix: String,
    pub token_variable: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            branch_to_merge: BRANCH_TO_MERGE.to_string(),
            branch_to_merge_into: BRANCH_TO_MERGE_INTO.to_string(),
            remote_url: REMOTE_URL.to_string(),
            repository: String::new(),
            git_username: String::new(),
            git_email: String::new(),
            configuration_file: PathBuf::from(CONFIGURATION_FILE),
            version_prefix: VERSION_PREFIX.to_string(),
            token_variable: TOKEN_VARIABLE.to_string(),
        }
    }
}

impl MergeSettings {
    /// Check that every field the merge workflow uses is present and well formed.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("branch_to_merge", &self.branch_to_merge),
            ("branch_to_merge_into", &self.branch_to_merge_into),
            ("repository", &self.repository),
            ("git_username", &self.git_username),
            ("git_email", &self.git_email),
            ("token_variable", &self.token_variable),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::MissingSetting(field));
            }
        }

        if self.branch_to_merge == self.branch_to_merge_into {
            return Err(Error::InvalidSetting {
                field: "branch_to_merge",
                message: format!(
                    "cannot merge '{}' into itself",
                    self.branch_to_merge_into
                ),
            });
        }

        self.repository_url().map(|_| ())
    }

    /// Full URL of the repository, without credentials.
    pub fn repository_url(&self) -> Result<Url> {
        // A base without trailing slash would lose its last path segment on join.
        let base = if self.remote_url.ends_with('/') {
            Url::parse(&self.remote_url)?
        } else {
            Url::parse(&format!("{}/", self.remote_url))?
        };

        if !matches!(base.scheme(), "https" | "http") {
            return Err(Error::InvalidSetting {
                field: "remote_url",
                message: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        let url = base.join(self.repository.trim_start_matches('/'))?;
        if url.origin() != base.origin() {
            return Err(Error::InvalidSetting {
                field: "repository",
                message: format!(
                    "'{}' points outside of {}",
                    self.repository, self.remote_url
                ),
            });
        }
        Ok(url)
    }

    /// Repository URL carrying `token` as its user name.
    pub fn authenticated_url(&self, token: &str) -> Result<Url> {
        let mut url = self.repository_url()?;
        url.set_username(token).map_err(|_| Error::InvalidSetting {
            field: "remote_url",
            message: "url cannot carry credentials".to_string(),
        })?;
        Ok(url)
    }

    /// Tag name for a release of `version`.
    pub fn tag_for(&self, version: &str) -> String {
        format!("{}{}", self.version_prefix, version)
    }

    /// Read the push token from the context.
    pub fn token(&self, env: &Environment) -> Result<String> {
        Ok(env.get_var(&self.token_variable)?)
    }
}
