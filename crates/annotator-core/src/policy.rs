//! Policy text parsing
//!
//! Policy arrives in one of two shapes:
//!
//! - a single YAML document mapping rule name to rule record
//!   (`parse_policy`)
//! - a set of named entries, each holding the YAML of one rule record, as
//!   stored in the source object's data (`parse_policy_entries`)
//!
//! Parsing only checks structure. Pattern grammar is enforced when the
//! result is turned into a [`crate::rules::RuleSet`].

use std::collections::BTreeMap;

use crate::errors::{AnnotatorError, Result};
use crate::model::RawRule;

/// Parse a whole policy document
///
/// Blank text, `null` and `~` all yield an empty policy.
///
/// # Errors
/// `PolicyParse` if the text is not YAML or not a mapping of rule records.
pub fn parse_policy(text: &str) -> Result<BTreeMap<String, RawRule>> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let parsed: Option<BTreeMap<String, RawRule>> =
        serde_yaml::from_str(text).map_err(|e| AnnotatorError::PolicyParse {
            message: e.to_string(),
        })?;

    Ok(parsed.unwrap_or_default())
}

/// Parse the YAML of a single rule record
///
/// Returns `Ok(None)` when the text is blank; such entries carry no rule.
///
/// # Errors
/// `EntryParse` naming the entry if the text is not a rule record.
pub fn parse_rule_entry(entry: &str, text: &str) -> Result<Option<RawRule>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    serde_yaml::from_str::<RawRule>(text)
        .map(Some)
        .map_err(|e| AnnotatorError::EntryParse {
            entry: entry.to_string(),
            message: e.to_string(),
        })
}

/// Parse every entry of a source object's data into raw rules
///
/// # Errors
/// The first entry (by name) that fails to parse.
pub fn parse_policy_entries(
    entries: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, RawRule>> {
    let mut rules = BTreeMap::new();
    for (entry, text) in entries {
        if let Some(rule) = parse_rule_entry(entry, text)? {
            rules.insert(entry.clone(), rule);
        }
    }
    Ok(rules)
}
