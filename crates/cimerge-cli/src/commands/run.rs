//! Direct command execution.

use anyhow::{Result, bail};
use cimerge_core::Environment;
use cimerge_executor::CommandLine;

/// Run a command given either as `argv` or as a `line` to split into words.
pub fn run(assignments: Vec<(String, String)>, line: Option<String>, argv: Vec<String>) -> Result<()> {
    let command = match line {
        Some(line) => CommandLine::parse(&line)?,
        None if argv.is_empty() => bail!("No command given; pass it after `--` or with --line"),
        None => CommandLine::from_argv(argv)?,
    };

    let mut env = Environment::from_process();
    for (name, value) in assignments {
        env.set_var(name, value);
    }

    cimerge_executor::run(&command, &env)?;
    Ok(())
}
