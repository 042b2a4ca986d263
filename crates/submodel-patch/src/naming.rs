//! Name policy for new list items.
//!
//! New items need idShorts that are unique among their siblings and
//! acceptable to the contract (whitelist and naming rule). Names are
//! generated from a template whose digit run acts as a counter:
//! `Item000` renders `Item001`, `Item002`, ... until a free name is
//! found. Explicit caller-supplied names bypass generation but not
//! validation, and a colliding explicit name is an error, never
//! silently renamed.

use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::contract::NamingRule;

/// idShort shape per the AAS metamodel.
const ID_SHORT_PATTERN: &str = "^[a-zA-Z][a-zA-Z0-9_]*$";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("name '{name}' collides with an existing sibling")]
    Collision { name: String },
    #[error("name '{name}' is not in the allowed idShort set")]
    NotAllowed { name: String },
    #[error("name '{name}' violates naming rule ({rule})")]
    RuleViolation { name: String, rule: NamingRule },
    #[error("invalid naming pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

// ── Name template ─────────────────────────────────────────────────────────

/// A name pattern split around its first digit run: `Sensor04Cfg` becomes
/// prefix `Sensor`, counter width 2, suffix `Cfg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    prefix: String,
    width: usize,
    suffix: String,
}

impl NameTemplate {
    /// Generalize the first digit run of `pattern` into the counter.
    /// Returns `None` for patterns without digits.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let start = pattern.find(|c: char| c.is_ascii_digit())?;
        let width = pattern[start..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        Some(NameTemplate {
            prefix: pattern[..start].to_string(),
            width,
            suffix: pattern[start + width..].to_string(),
        })
    }

    /// Render the template with counter value `n`, zero-padded to the
    /// template's width. Counters wider than the template print in full.
    pub fn render(&self, n: usize) -> String {
        format!("{}{:0width$}{}", self.prefix, n, self.suffix, width = self.width)
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        NameTemplate {
            prefix: "Item".to_string(),
            width: 3,
            suffix: String::new(),
        }
    }
}

// ── Policy ────────────────────────────────────────────────────────────────

/// Naming constraints for one list, assembled from the contract and the
/// existing siblings.
#[derive(Debug)]
pub struct NamePolicy<'a> {
    template: NameTemplate,
    allowed: Option<&'a [String]>,
    rule: Option<&'a NamingRule>,
}

impl<'a> NamePolicy<'a> {
    /// The template comes from the first whitelist entry carrying a digit
    /// run, else from a sibling's literal name with its digit run
    /// generalized, else the `Item000` default.
    pub fn new(
        allowed: Option<&'a [String]>,
        rule: Option<&'a NamingRule>,
        sibling_name: Option<&str>,
    ) -> Self {
        let template = allowed
            .and_then(|entries| entries.iter().find_map(|entry| NameTemplate::from_pattern(entry)))
            .or_else(|| sibling_name.and_then(NameTemplate::from_pattern))
            .unwrap_or_default();
        NamePolicy { template, allowed, rule }
    }

    /// Produce the name for a new item. An explicit name is used as-is;
    /// otherwise the template counter increments past every used name.
    /// The result is validated against the whitelist and the naming rule.
    pub fn assign(
        &self,
        explicit: Option<&str>,
        used: &HashSet<String>,
    ) -> Result<String, NamingError> {
        let name = match explicit {
            Some(name) => {
                if used.contains(name) {
                    return Err(NamingError::Collision { name: name.to_string() });
                }
                name.to_string()
            }
            None => self.next_free(used),
        };
        self.check_allowed(&name)?;
        self.check_rule(&name)?;
        trace!(name = %name, "assigned list item name");
        Ok(name)
    }

    /// Counter values render pairwise-distinct names, so a free one exists
    /// within `used.len() + 1` attempts.
    fn next_free(&self, used: &HashSet<String>) -> String {
        let mut counter = 1usize;
        loop {
            let candidate = self.template.render(counter);
            if !used.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn check_allowed(&self, name: &str) -> Result<(), NamingError> {
        let Some(entries) = self.allowed else {
            return Ok(());
        };
        for entry in entries {
            if entry == name || entry_admits(entry, name)? {
                return Ok(());
            }
        }
        Err(NamingError::NotAllowed { name: name.to_string() })
    }

    fn check_rule(&self, name: &str) -> Result<(), NamingError> {
        let Some(rule) = self.rule else {
            return Ok(());
        };
        let pattern = match rule {
            NamingRule::FreeForm => return Ok(()),
            NamingRule::Identifier => ID_SHORT_PATTERN.to_string(),
            NamingRule::Pattern(pattern) => format!("^(?:{pattern})$"),
        };
        let re = Regex::new(&pattern).map_err(|err| NamingError::InvalidPattern {
            pattern,
            reason: err.to_string(),
        })?;
        if re.is_match(name) {
            Ok(())
        } else {
            Err(NamingError::RuleViolation {
                name: name.to_string(),
                rule: rule.clone(),
            })
        }
    }
}

/// Whether a templated whitelist entry admits `name`: digit runs in the
/// entry match any digit run, everything else matches literally.
fn entry_admits(entry: &str, name: &str) -> Result<bool, NamingError> {
    if !entry.bytes().any(|b| b.is_ascii_digit()) {
        return Ok(false);
    }
    let mut pattern = String::from("^");
    let mut literal = String::new();
    let mut in_digits = false;
    for c in entry.chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(r"\d+");
                in_digits = true;
            }
        } else {
            in_digits = false;
            literal.push(c);
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');
    let re = Regex::new(&pattern).map_err(|err| NamingError::InvalidPattern {
        pattern: entry.to_string(),
        reason: err.to_string(),
    })?;
    Ok(re.is_match(name))
}
