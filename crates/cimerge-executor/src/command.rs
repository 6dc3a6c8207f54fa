//! Argument-vector commands.

use std::fmt;

use crate::{CommandError, CommandResult};

const REDACTED: &str = "[REDACTED]";

/// A program and its arguments, run without a shell.
///
/// Strings registered with [`CommandLine::secret`] are replaced by
/// `[REDACTED]` wherever the command is printed, logged or reported in an
/// error.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    secrets: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Mark `value` as secret. Empty values are ignored.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() && !self.secrets.contains(&value) {
            self.secrets.push(value);
        }
        self
    }

    /// Build a command from an argument vector; the first element is the program.
    pub fn from_argv<I, S>(argv: I) -> CommandResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv
            .next()
            .filter(|p: &String| !p.is_empty())
            .ok_or_else(|| CommandError::InvalidCommandLine("empty command".to_string()))?;
        Ok(Self::new(program).args(argv))
    }

    /// Split `line` into words the way a shell would, without expanding anything.
    ///
    /// Single quotes keep their content literally, double quotes allow `\"`
    /// and `\\` escapes, and a backslash outside quotes escapes the next
    /// character. Variables, globs and operators are not interpreted.
    pub fn parse(line: &str) -> CommandResult<Self> {
        Self::from_argv(split_words(line)?)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Printable form with every secret replaced.
    pub fn redacted(&self) -> String {
        let mut rendered = quote(&self.mask(&self.program));
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&quote(&self.mask(arg)));
        }
        rendered
    }

    // Secrets are masked in the raw word; quoting could split them apart.
    fn mask(&self, word: &str) -> String {
        self.secrets
            .iter()
            .fold(word.to_string(), |word, secret| {
                word.replace(secret.as_str(), REDACTED)
            })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

// Debug goes through the redacted form too so `{:?}` never leaks a secret.
impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandLine").field(&self.redacted()).finish()
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

fn split_words(line: &str) -> CommandResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(e @ ('"' | '\\')) => current.push(e),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(unterminated('"')),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => {
                        return Err(CommandError::InvalidCommandLine(
                            "trailing backslash".to_string(),
                        ));
                    }
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn unterminated(quote: char) -> CommandError {
    CommandError::InvalidCommandLine(format!("unterminated {} quote", quote))
}
