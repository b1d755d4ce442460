//! Rule mapping: the ordered key -> pattern-list structure behind a Switch
//! profile, plus parsing from the commented-JSON documents users author.

use indexmap::IndexMap;
use json_comments::StripComments;
use serde::{Deserialize, Serialize};

use crate::error::{SwitchError, SwitchResult};

/// Reserved rule-group key: route matching hosts directly
pub const DIRECT_RULE_KEY: &str = "direct";
/// Reserved rule-group key: defer matching hosts to the system proxy
pub const SYSTEM_RULE_KEY: &str = "system";

/// Starter rule document for new Switch profiles
pub const DEFAULT_RULES: &str = r#"{
  // connect directly, no proxy
  "direct": [],

  // use the system proxy
  "system": [],

  // route matching hosts through the fixed-proxy profile with this name
  "whistle": [
    "local.dev"
  ]
}"#;

/// Ordered mapping from rule-group key to host regex patterns.
///
/// Keys are either the reserved tokens [`DIRECT_RULE_KEY`] / [`SYSTEM_RULE_KEY`]
/// (matched case-sensitively) or the case-insensitive name of a fixed-proxy
/// profile. Insertion order is the evaluation order of the compiled script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleMapping(IndexMap<String, Vec<String>>);

impl RuleMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule document. `//` and `/* */` comments are allowed.
    ///
    /// Fails wholesale on structurally invalid input: a document that is not
    /// an object, or a group value that is not a list of strings. Pattern
    /// regex validity is deliberately not checked here; bad patterns surface
    /// when the compiled rules are evaluated.
    pub fn parse(text: &str) -> SwitchResult<Self> {
        let stripped = StripComments::new(text.as_bytes());
        let doc: serde_json::Value = serde_json::from_reader(stripped)?;
        if !doc.is_object() {
            return Err(SwitchError::RuleDocumentNotObject);
        }
        // serde_json::Value does not keep key order, so the ordered map is
        // deserialized in a second pass.
        let stripped = StripComments::new(text.as_bytes());
        let entries: IndexMap<String, serde_json::Value> = serde_json::from_reader(stripped)?;
        Self::from_entries(entries)
    }

    /// Build from pre-parsed JSON entries, validating each group value
    pub fn from_entries(entries: IndexMap<String, serde_json::Value>) -> SwitchResult<Self> {
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let items = value
                .as_array()
                .ok_or_else(|| SwitchError::InvalidRuleGroup { key: key.clone() })?;
            let mut patterns = Vec::with_capacity(items.len());
            for item in items {
                let pattern = item
                    .as_str()
                    .ok_or_else(|| SwitchError::InvalidRuleGroup { key: key.clone() })?;
                patterns.push(pattern.to_string());
            }
            map.insert(key, patterns);
        }
        Ok(Self(map))
    }

    /// Append a rule group. Re-inserting a key replaces its patterns but
    /// keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, patterns: Vec<String>) {
        self.0.insert(key.into(), patterns);
    }

    /// Groups in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
