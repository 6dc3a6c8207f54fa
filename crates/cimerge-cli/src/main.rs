//! cimerge CLI tool.

use std::path::PathBuf;

use cimerge_core::MergeSettings;
use cimerge_core::settings::{
    BRANCH_TO_MERGE, BRANCH_TO_MERGE_INTO, CONFIGURATION_FILE, REMOTE_URL, TOKEN_VARIABLE,
    VERSION_PREFIX,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cimerge")]
#[command(about = "CI helpers for merging and releasing a package", long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` (defaults to RUST_LOG, then `info`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SettingsArgs {
    /// Package configuration file
    #[arg(long = "config", env = "CIMERGE_CONFIGURATION", default_value = CONFIGURATION_FILE, global = true)]
    configuration_file: PathBuf,

    /// Branch whose commits get merged
    #[arg(long, env = "CIMERGE_BRANCH_TO_MERGE", default_value = BRANCH_TO_MERGE, global = true)]
    branch_to_merge: String,

    /// Branch receiving the merge
    #[arg(long, env = "CIMERGE_BRANCH_TO_MERGE_INTO", default_value = BRANCH_TO_MERGE_INTO, global = true)]
    branch_to_merge_into: String,

    /// Base URL of the remote host
    #[arg(long, env = "CIMERGE_REMOTE_URL", default_value = REMOTE_URL, global = true)]
    remote_url: String,

    /// Repository path on the remote host, e.g. `owner/project.git`
    #[arg(long, env = "CIMERGE_REPOSITORY", global = true)]
    repository: Option<String>,

    /// Git user name for the merge commit, e.g. `ci-bot`
    #[arg(long, env = "CIMERGE_GIT_USERNAME", global = true)]
    git_username: Option<String>,

    /// Git email for the merge commit, e.g. `ci-bot@example.com`
    #[arg(long, env = "CIMERGE_GIT_EMAIL", global = true)]
    git_email: Option<String>,

    /// Prefix prepended to the version when tagging
    #[arg(long, env = "CIMERGE_VERSION_PREFIX", default_value = VERSION_PREFIX, global = true)]
    version_prefix: String,

    /// Environment variable holding the push token
    #[arg(long, env = "CIMERGE_TOKEN_VARIABLE", default_value = TOKEN_VARIABLE, global = true)]
    token_variable: String,
}

impl From<SettingsArgs> for MergeSettings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            branch_to_merge: args.branch_to_merge,
            branch_to_merge_into: args.branch_to_merge_into,
            remote_url: args.remote_url,
            repository: args.repository.unwrap_or_default(),
            git_username: args.git_username.unwrap_or_default(),
            git_email: args.git_email.unwrap_or_default(),
            configuration_file: args.configuration_file,
            version_prefix: args.version_prefix,
            token_variable: args.token_variable,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print name, version, description and homepage of the package
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the application name (`app` in the DEFAULT section)
    AppName,
    /// Print one configuration value
    Get {
        section: String,
        key: String,
        /// Print the value as written, without interpolation or quote stripping
        #[arg(long)]
        raw: bool,
    },
    /// Print the major.minor part of the package version
    ShortVersion,
    /// Print an environment variable
    Env { name: String },
    /// Run a command directly, without a shell
    Run {
        /// Variable to set for the command
        #[arg(long = "env", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        env: Vec<(String, String)>,
        /// Command line to split into words
        #[arg(long, conflicts_with = "argv")]
        line: Option<String>,
        /// Program and arguments, after `--`
        #[arg(last = true)]
        argv: Vec<String>,
    },
    /// Merge the integration branch into the release branch and push it
    Merge {
        /// Tag the merge with the package version and push the tag
        #[arg(long)]
        tag: bool,
        /// Print the steps instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective merge settings as JSON
    Settings,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, found '{}'", s)),
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Logs go to stderr so stdout only carries results.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let settings = MergeSettings::from(cli.settings);
    let config = settings.configuration_file.as_path();

    match cli.command {
        Commands::Summary { json } => commands::summary(config, json)?,
        Commands::AppName => commands::app_name(config)?,
        Commands::Get { section, key, raw } => commands::get(config, &section, &key, raw)?,
        Commands::ShortVersion => commands::short_version(config)?,
        Commands::Env { name } => commands::env(&name)?,
        Commands::Run { env, line, argv } => commands::run::run(env, line, argv)?,
        Commands::Merge { tag, dry_run } => commands::merge::merge(&settings, tag, dry_run)?,
        Commands::Settings => commands::settings(&settings)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("A=b=c").unwrap(),
            ("A".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_assignment("EMPTY=").unwrap(), ("EMPTY".to_string(), String::new()));
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "cimerge", "run", "--env", "A=1", "--env", "B=2", "--", "cargo", "test", "--all",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { env, line, argv } => {
                assert_eq!(env.len(), 2);
                assert_eq!(line, None);
                assert_eq!(argv, ["cargo", "test", "--all"]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_line_conflicts_with_argv() {
        assert!(Cli::try_parse_from(["cimerge", "run", "--line", "true", "--", "false"]).is_err());
    }

    #[test]
    fn test_settings_flags() {
        let cli = Cli::try_parse_from([
            "cimerge",
            "merge",
            "--repository",
            "acme/widgets.git",
            "--git-username",
            "ci-bot",
            "--git-email",
            "ci@example.com",
            "--version-prefix",
            "v",
            "--config",
            "sub/Cargo.toml",
        ])
        .unwrap();
        let settings = MergeSettings::from(cli.settings);
        assert_eq!(settings.repository, "acme/widgets.git");
        assert_eq!(settings.version_prefix, "v");
        assert_eq!(settings.configuration_file, PathBuf::from("sub/Cargo.toml"));
        assert_eq!(settings.branch_to_merge, BRANCH_TO_MERGE);
        assert!(settings.validate().is_ok());
    }
}
