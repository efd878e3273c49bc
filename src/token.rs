use crate::{EnvTokenError, Result};
use memchr::memmem;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Source of substitution values, keyed by a placeholder's inner name
pub trait VariableSource {
    /// Returns `None` when the variable is unset or empty
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Plain process environment lookup (no `INPUT_` prefix)
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl VariableSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        // names the platform cannot hold are never set
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

/// Line-anchored placeholder pattern built from the configured delimiters.
///
/// A placeholder is only recognized when it fills an entire line: the line
/// starts with the prefix and ends with the suffix. Matching runs over raw
/// bytes, so files that are not UTF-8 are scanned like any other. Compiled
/// once and shared by every file of a run.
#[derive(Debug, Clone)]
pub struct DelimiterPattern {
    regex: Regex,
    prefix: String,
    suffix: String,
}

impl DelimiterPattern {
    pub fn new(prefix: &str, suffix: &str) -> Result<Self> {
        // `(?-u:.)` matches any byte but a line terminator, valid UTF-8 or not
        let regex = Regex::new(&format!(
            "(?mR)^{}(?-u:.)*{}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ))?;

        Ok(Self {
            regex,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Distinct placeholders (delimiters included) found in `content`
    pub fn find_tokens<'a>(&self, content: &'a [u8]) -> HashSet<&'a [u8]> {
        self.regex
            .find_iter(content)
            .map(|m| m.as_bytes())
            .inspect(|token| info!(token = %String::from_utf8_lossy(token), "Matched placeholder"))
            .collect()
    }

    /// The bytes between the delimiters of `token`
    pub fn inner_name<'a>(&self, token: &'a [u8]) -> &'a [u8] {
        let start = self.prefix.len();
        let end = token.len().saturating_sub(self.suffix.len()).max(start);
        token.get(start..end).unwrap_or_default()
    }
}

/// Replace every non-overlapping occurrence of `needle` in `haystack`
fn replace_all(haystack: &[u8], needle: &[u8], with: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }

    let mut output = Vec::with_capacity(haystack.len());
    let mut last = 0;
    for start in memmem::find_iter(haystack, needle) {
        output.extend_from_slice(&haystack[last..start]);
        output.extend_from_slice(with);
        last = start + needle.len();
    }
    output.extend_from_slice(&haystack[last..]);
    output
}

/// Resolve every placeholder of `content` and return the substituted bytes.
///
/// All placeholders are resolved before any replacement happens, so an
/// unresolved placeholder in strict mode leaves nothing half-applied. With
/// `fail_on_missing` off, unresolved placeholders are replaced by the empty
/// string. A name that is not valid UTF-8 cannot name a variable and is
/// always unresolved. Replacement values are not rescanned.
///
/// Returns `None` when `content` holds no placeholder.
pub fn substitute<S: VariableSource + ?Sized>(
    content: &[u8],
    pattern: &DelimiterPattern,
    vars: &S,
    fail_on_missing: bool,
    path: &Path,
) -> Result<Option<Substitution>> {
    let tokens = pattern.find_tokens(content);
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut resolved = Vec::with_capacity(tokens.len());
    for token in tokens {
        let raw_name = pattern.inner_name(token);
        let value = std::str::from_utf8(raw_name)
            .ok()
            .and_then(|name| vars.lookup(name));

        let value = match value {
            Some(value) => value,
            None if fail_on_missing => {
                return Err(EnvTokenError::UnresolvedToken {
                    name: String::from_utf8_lossy(raw_name).into_owned(),
                    path: path.to_path_buf(),
                });
            }
            None => {
                let name: Cow<'_, str> = String::from_utf8_lossy(raw_name);
                debug!(%name, path = %path.display(), "No value for placeholder, removing it");
                String::new()
            }
        };
        resolved.push((token, value));
    }

    let mut output = content.to_vec();
    for (token, value) in &resolved {
        output = replace_all(&output, token, value.as_bytes());
    }

    Ok(Some(Substitution {
        content: output,
        tokens: resolved.len(),
    }))
}

/// Result of substituting one file's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub content: Vec<u8>,
    /// Number of distinct placeholders replaced
    pub tokens: usize,
}
