//! Merge workflow.
//!
//! Merges the integration branch into the release branch and pushes the
//! result, optionally tagging the release with the package version.

use cimerge_core::{Environment, MergeSettings};
use thiserror::Error;
use tracing::info;

use crate::{CommandError, CommandLine, CommandRunner};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Settings(#[from] cimerge_core::Error),

    #[error("merge step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: CommandError,
    },
}

pub type MergeResult<T> = std::result::Result<T, MergeError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Tag the merge commit with the prefixed package version and push the tag.
    pub tag: bool,
}

/// Ordered git commands that perform one merge.
#[derive(Debug, Clone)]
pub struct MergePlan {
    steps: Vec<CommandLine>,
    tag: Option<String>,
}

impl MergePlan {
    /// Build the plan for `settings`, pushing with `token`.
    pub fn new(
        settings: &MergeSettings,
        version: &str,
        token: &str,
        options: MergeOptions,
    ) -> MergeResult<Self> {
        settings.validate()?;

        let remote = settings.authenticated_url(token)?;
        // The URL may carry the token percent-encoded.
        let encoded_token = remote.username().to_string();
        let remote = remote.to_string();
        let push = |refname: &str| {
            CommandLine::new("git")
                .args(["push", remote.as_str(), refname])
                .secret(token)
                .secret(encoded_token.as_str())
        };

        let mut steps = vec![
            git(["config", "user.name", settings.git_username.as_str()]),
            git(["config", "user.email", settings.git_email.as_str()]),
            git(["checkout", settings.branch_to_merge_into.as_str()]),
            git(["merge", "--no-edit", settings.branch_to_merge.as_str()]),
        ];

        let tag = options.tag.then(|| settings.tag_for(version));
        if let Some(tag) = &tag {
            steps.push(git(["tag", tag.as_str()]));
        }

        steps.push(push(settings.branch_to_merge_into.as_str()));
        if let Some(tag) = &tag {
            steps.push(push(tag.as_str()));
        }

        Ok(Self { steps, tag })
    }

    /// Build the plan reading the token from `env`.
    pub fn from_environment(
        settings: &MergeSettings,
        version: &str,
        env: &Environment,
        options: MergeOptions,
    ) -> MergeResult<Self> {
        let token = settings.token(env)?;
        Self::new(settings, version, &token, options)
    }

    pub fn steps(&self) -> &[CommandLine] {
        &self.steps
    }

    /// Tag created by this plan, if tagging was requested.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute(&self, runner: &dyn CommandRunner, env: &Environment) -> MergeResult<()> {
        let total = self.steps.len();
        for (index, command) in self.steps.iter().enumerate() {
            let step = index + 1;
            info!(step, total, command = %command, "Running merge step");
            runner
                .run(command, env)
                .map_err(|source| MergeError::Step { step, source })?;
        }
        info!(tag = ?self.tag, "Merge completed");
        Ok(())
    }
}

fn git<'a>(args: impl IntoIterator<Item = &'a str>) -> CommandLine {
    CommandLine::new("git").args(args)
}
