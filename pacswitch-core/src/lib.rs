//! Pacswitch Core - Proxy Profiles & Switch-Rule Compiler
//!
//! This crate models named proxy routing policies ("profiles") and compiles
//! a switch profile's declarative rule mapping into a host-to-proxy decision
//! artifact:
//!
//! - **Profile**: direct, system, fixed-proxy or rule-based switch policy
//! - **RuleMapping**: ordered rule-group -> host-pattern-list structure
//! - **compile**: rule mapping + profile list -> PAC script, typed clause
//!   list and unresolved-reference warnings
//!
//! Compilation is a pure function of its inputs: no I/O, no state between
//! calls, identical inputs give identical outputs. Unresolved rule-group
//! references are warnings, never errors; hosts in such a group fall back
//! to `DIRECT`.
//!
//! ## Example
//!
//! ```rust
//! use pacswitch_core::{compile, Profile, ProxyEndpoint, ProxyScheme, RuleMapping};
//!
//! let profiles = vec![Profile::fixed_proxy(
//!     "v2ray",
//!     ProxyEndpoint::new(ProxyScheme::Socks5, "127.0.0.1", 1080).unwrap(),
//!     vec![],
//! )];
//! let rules = RuleMapping::parse(r#"{
//!     // hosts that never go through a proxy
//!     "direct": ["local.dev"],
//!     "v2ray": ["google.com", "youtube.com"]
//! }"#).unwrap();
//!
//! let out = compile(&rules, &profiles);
//! assert!(out.warnings.is_empty());
//! assert!(out.script.starts_with("function FindProxyForURL(url, host)"));
//! ```

pub mod bypass;
pub mod compiler;
pub mod error;
pub mod profile;
pub mod registry;
pub mod rules;

// Re-exports
pub use bypass::BypassMatcher;
pub use compiler::{compile, Clause, CompileOutput, CompiledRuleSet};
pub use error::{SwitchError, SwitchResult};
pub use profile::{Directive, Profile, ProfileKind, ProfileSet, ProxyEndpoint, ProxyScheme};
pub use rules::{RuleMapping, DEFAULT_RULES, DIRECT_RULE_KEY, SYSTEM_RULE_KEY};
