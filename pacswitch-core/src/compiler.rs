//! Rule compiler: turns a rule mapping plus a profile list into an ordered
//! clause list and the PAC decision script the platform consumes.
//!
//! Compilation is a pure one-shot transform. Unresolved rule-group
//! references are never fatal: the clause is dropped, a warning is recorded,
//! and those hosts fall through to the default `DIRECT`.

use regex::Regex;
use tracing::warn;

use crate::profile::{Directive, Profile};
use crate::registry;
use crate::rules::{RuleMapping, DIRECT_RULE_KEY, SYSTEM_RULE_KEY};

/// One decision clause: if any pattern matches the host, return the directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub directive: Directive,
    /// Regex sources, matched unanchored against the host
    pub patterns: Vec<String>,
}

/// Compiled clause list, evaluated first-match-wins with a `DIRECT` fallback.
///
/// This is the typed counterpart of the emitted script: same clauses, same
/// order, same semantics, but evaluated in-process without executing
/// generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledRuleSet {
    clauses: Vec<Clause>,
}

impl CompiledRuleSet {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Decide the directive for a host.
    ///
    /// Patterns are compiled when tested, not when the rule set is built:
    /// an invalid regex source is reported here, counts as a non-match, and
    /// never fails the evaluation.
    pub fn evaluate(&self, host: &str) -> Directive {
        for clause in &self.clauses {
            for pattern in &clause.patterns {
                match Regex::new(pattern) {
                    Ok(re) => {
                        if re.is_match(host) {
                            return clause.directive.clone();
                        }
                    }
                    Err(e) => {
                        warn!("Invalid host pattern '{}': {}", pattern, e);
                    }
                }
            }
        }
        Directive::Direct
    }

    /// Render the PAC script. The function name, parameter names and
    /// directive strings are fixed by the platform's proxy API.
    pub fn render_script(&self) -> String {
        let mut script = String::from("function FindProxyForURL(url, host) {\n");
        for clause in &self.clauses {
            let tests: Vec<String> = clause
                .patterns
                .iter()
                .map(|p| format!("new RegExp('{}').test(host)", escape_js_single_quoted(p)))
                .collect();
            script.push_str(&format!(
                "  if ({}) {{ return \"{}\"; }}\n",
                tests.join(" || "),
                clause.directive
            ));
        }
        script.push_str("  return \"DIRECT\";\n}");
        script
    }
}

/// Compiler output: the script plus its typed form and any warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub script: String,
    pub rules: CompiledRuleSet,
    /// One entry per rule group that referenced a missing or
    /// non-fixed-proxy profile, in rule order
    pub warnings: Vec<String>,
}

/// Compile a rule mapping against a profile list.
///
/// Groups are processed in insertion order, which becomes clause order in
/// the output (first match wins at evaluation time). The reserved keys
/// `direct` and `system` are matched case-sensitively and never looked up
/// in the profile list; every other key resolves case-insensitively to a
/// fixed-proxy profile. Groups with an empty pattern list are skipped
/// silently.
pub fn compile(rules: &RuleMapping, profiles: &[Profile]) -> CompileOutput {
    let mut clauses = Vec::new();
    let mut warnings = Vec::new();

    for (key, patterns) in rules.iter() {
        if patterns.is_empty() {
            continue;
        }
        let directive = match key {
            DIRECT_RULE_KEY => Directive::Direct,
            SYSTEM_RULE_KEY => Directive::System,
            _ => match registry::resolve(key, profiles) {
                Some(endpoint) => endpoint.directive(),
                None => {
                    warnings.push(format!(
                        "no fixed-proxy profile found for rule group '{}'",
                        key
                    ));
                    continue;
                }
            },
        };
        clauses.push(Clause {
            directive,
            patterns: patterns.to_vec(),
        });
    }

    let rules = CompiledRuleSet { clauses };
    CompileOutput {
        script: rules.render_script(),
        rules,
        warnings,
    }
}

/// Escape a regex source for embedding in a single-quoted JS string literal.
///
/// Newlines are legal inside a JSON pattern string but would leave the JS
/// literal unterminated, so they are escaped along with quotes and
/// backslashes.
fn escape_js_single_quoted(source: &str) -> String {
    source
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
