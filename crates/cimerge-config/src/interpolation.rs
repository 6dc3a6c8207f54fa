//! `${...}` interpolation of configuration values.
//!
//! Supports:
//! - `${key}` - another key of the same section (or `DEFAULT`)
//! - `${section:key}` - a key of another section
//! - `$$` - a literal `$`

use std::sync::LazyLock;

use regex::Regex;

use crate::{ConfigDocument, ConfigError, ConfigResult};

/// Nesting limit; also what stops reference cycles.
const MAX_DEPTH: usize = 10;

// Matches `$$`, `${...}` or a lone `$` (which is an error).
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:(\$)|\{([^{}]*)\})?").unwrap());

/// Resolve every reference in `raw`, the value of `key` in `section`.
pub(crate) fn interpolate(
    doc: &ConfigDocument,
    section: &str,
    key: &str,
    raw: &str,
) -> ConfigResult<String> {
    interpolate_at(doc, section, key, raw, 1)
}

fn interpolate_at(
    doc: &ConfigDocument,
    section: &str,
    key: &str,
    raw: &str,
    depth: usize,
) -> ConfigResult<String> {
    if depth > MAX_DEPTH {
        return Err(ConfigError::InterpolationDepth {
            section: section.to_string(),
            key: key.to_string(),
        });
    }

    let mut result = String::with_capacity(raw.len());
    let mut last = 0;

    for caps in TOKEN_REGEX.captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&raw[last..whole.start()]);
        last = whole.end();

        if caps.get(1).is_some() {
            result.push('$');
            continue;
        }

        let Some(reference) = caps.get(2) else {
            return Err(bad_interpolation(
                section,
                key,
                format!(
                    "'$' must be followed by '$' or '{{', found: '{}'",
                    &raw[whole.start()..]
                ),
            ));
        };

        let (ref_section, ref_key) = split_reference(section, reference.as_str())
            .ok_or_else(|| {
                bad_interpolation(
                    section,
                    key,
                    format!("more than one ':' found: '{}'", reference.as_str()),
                )
            })?;

        let value = doc.raw(ref_section, ref_key).map_err(|_| {
            bad_interpolation(
                section,
                key,
                format!("reference '{}' not found", reference.as_str()),
            )
        })?;

        if value.contains('$') {
            result.push_str(&interpolate_at(doc, ref_section, ref_key, value, depth + 1)?);
        } else {
            result.push_str(value);
        }
    }

    result.push_str(&raw[last..]);
    Ok(result)
}

fn split_reference<'a>(section: &'a str, reference: &'a str) -> Option<(&'a str, &'a str)> {
    let mut parts = reference.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), None, _) => Some((section, key)),
        (Some(other), Some(key), None) => Some((other, key)),
        _ => None,
    }
}

fn bad_interpolation(section: &str, key: &str, message: String) -> ConfigError {
    ConfigError::Interpolation {
        section: section.to_string(),
        key: key.to_string(),
        message,
    }
}
