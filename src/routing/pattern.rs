//! Path pattern compilation.
//!
//! # Responsibilities
//! - Turn `/movies/{title}` into an anchored matcher
//! - Remember placeholder names in declaration order
//! - Reject malformed placeholders at registration time
//!
//! # Design Decisions
//! - Placeholder values match `[a-zA-Z0-9_-]+` and never contain `/`
//! - Literal text is regex-escaped, so `.` in a pattern is a literal dot
//! - Captures are positional; names are kept alongside for introspection

use regex::Regex;

use crate::routing::RouteError;

/// Character class a placeholder value may consist of.
const PLACEHOLDER_VALUE: &str = "([a-zA-Z0-9_-]+)";

/// A route pattern compiled into an anchored regex.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<String>,
}

impl CompiledPattern {
    /// The pattern this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in left-to-right order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Number of capture groups in the compiled regex (excluding the whole match).
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Returns true if `path` fully matches the pattern.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and return placeholder values aligned with [`placeholders`].
    ///
    /// [`placeholders`]: CompiledPattern::placeholders
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}

/// Compile a path pattern.
pub fn compile(pattern: &str) -> Result<CompiledPattern, RouteError> {
    let invalid = |reason: String| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let mut expr = String::with_capacity(pattern.len() + 16);
    let mut placeholders = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices();

    expr.push('^');
    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(invalid(format!("unclosed placeholder at offset {}", pos)));
                }
                if name.is_empty() {
                    return Err(invalid("empty placeholder name".to_string()));
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid(format!(
                        "placeholder `{}` may only contain [a-zA-Z0-9_]",
                        name
                    )));
                }

                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(PLACEHOLDER_VALUE);
                placeholders.push(name);
            }
            '}' => {
                return Err(invalid(format!("unbalanced `}}` at offset {}", pos)));
            }
            _ => literal.push(c),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');

    let regex = Regex::new(&expr).map_err(|e| invalid(e.to_string()))?;

    Ok(CompiledPattern {
        source: pattern.to_string(),
        regex,
        placeholders,
    })
}
