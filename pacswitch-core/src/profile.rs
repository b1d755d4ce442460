//! Profile model: proxy endpoints, profile kinds and the profile set.
//!
//! A profile is a named routing policy. `Direct` and `System` carry no
//! payload, `FixedProxy` carries one endpoint plus a bypass list, and
//! `Switch` carries a rule mapping compiled by [`crate::compiler`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SwitchError, SwitchResult};
use crate::rules::RuleMapping;

/// Proxy endpoint scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    Http,
    Https,
    Socks5,
}

/// A fixed proxy server endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
}

impl ProxyEndpoint {
    /// Create an endpoint, rejecting empty hosts and port 0
    pub fn new(scheme: ProxyScheme, host: impl Into<String>, port: u16) -> SwitchResult<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(SwitchError::InvalidEndpoint("host is empty".into()));
        }
        if port == 0 {
            return Err(SwitchError::InvalidEndpoint("port must be 1-65535".into()));
        }
        Ok(Self { scheme, host, port })
    }

    /// Platform directive for routing through this endpoint.
    ///
    /// SOCKS5 endpoints use the `SOCKS5` token, every other scheme uses
    /// `PROXY`. The two-token format is fixed by the platform's
    /// proxy-directive grammar.
    pub fn directive(&self) -> Directive {
        match self.scheme {
            ProxyScheme::Socks5 => Directive::Socks5 {
                host: self.host.clone(),
                port: self.port,
            },
            _ => Directive::Proxy {
                host: self.host.clone(),
                port: self.port,
            },
        }
    }
}

/// What the decision script returns for a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Connect without a proxy
    Direct,
    /// Defer to the system proxy configuration
    System,
    /// HTTP(S) proxy
    Proxy { host: String, port: u16 },
    /// SOCKS5 proxy
    Socks5 { host: String, port: u16 },
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Direct => write!(f, "DIRECT"),
            Directive::System => write!(f, "SYSTEM"),
            Directive::Proxy { host, port } => write!(f, "PROXY {}:{}", host, port),
            Directive::Socks5 { host, port } => write!(f, "SOCKS5 {}:{}", host, port),
        }
    }
}

/// Profile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Connect directly, no proxy
    Direct,
    /// Use the system proxy settings
    System,
    /// Route everything through one fixed endpoint
    FixedProxy,
    /// Rule-based switching via a compiled decision script
    Switch,
}

/// A named routing policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name (case-insensitive)
    pub name: String,
    pub kind: ProfileKind,
    /// Present iff kind == FixedProxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<ProxyEndpoint>,
    /// Hosts that skip the fixed proxy (FixedProxy only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bypass_list: Vec<String>,
    /// Rule mapping (Switch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_set: Option<RuleMapping>,
}

impl Profile {
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProfileKind::Direct,
            endpoint: None,
            bypass_list: Vec::new(),
            rule_set: None,
        }
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProfileKind::System,
            endpoint: None,
            bypass_list: Vec::new(),
            rule_set: None,
        }
    }

    pub fn fixed_proxy(
        name: impl Into<String>,
        endpoint: ProxyEndpoint,
        bypass_list: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ProfileKind::FixedProxy,
            endpoint: Some(endpoint),
            bypass_list,
            rule_set: None,
        }
    }

    pub fn switch(name: impl Into<String>, rule_set: RuleMapping) -> Self {
        Self {
            name: name.into(),
            kind: ProfileKind::Switch,
            endpoint: None,
            bypass_list: Vec::new(),
            rule_set: Some(rule_set),
        }
    }

    /// Check that exactly the field group for this kind is populated
    pub fn validate(&self) -> SwitchResult<()> {
        let ok = match self.kind {
            ProfileKind::Direct | ProfileKind::System => {
                self.endpoint.is_none() && self.bypass_list.is_empty() && self.rule_set.is_none()
            }
            ProfileKind::FixedProxy => self.endpoint.is_some() && self.rule_set.is_none(),
            ProfileKind::Switch => {
                self.endpoint.is_none() && self.bypass_list.is_empty() && self.rule_set.is_some()
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SwitchError::ProfileShape {
                name: self.name.clone(),
                kind: self.kind,
            })
        }
    }
}

/// The profile list plus the "one active profile" invariant.
///
/// All mutation goes through this type so the active marker can only ever
/// point at one profile and names stay unique under case-insensitive
/// comparison. Deserialization rebuilds the set through [`ProfileSet::insert`]
/// and [`ProfileSet::activate`], so stored data cannot smuggle in duplicate
/// names, malformed profiles or a dangling active marker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
    /// Name of the active profile, if any
    active: Option<String>,
}

impl ProfileSet {
    /// Empty set with the two builtin profiles
    pub fn with_builtins() -> Self {
        Self {
            profiles: vec![Profile::direct("direct"), Profile::system("system")],
            active: None,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Look up a profile by case-insensitive name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a validated profile; names are unique case-insensitively
    pub fn insert(&mut self, profile: Profile) -> SwitchResult<()> {
        profile.validate()?;
        if self.get(&profile.name).is_some() {
            return Err(SwitchError::DuplicateProfile(profile.name));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Remove a profile by name. Clears the active marker if it pointed here.
    pub fn remove(&mut self, name: &str) -> SwitchResult<Profile> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SwitchError::UnknownProfile(name.to_string()))?;
        if matches!(&self.active, Some(a) if a.eq_ignore_ascii_case(name)) {
            self.active = None;
        }
        Ok(self.profiles.remove(idx))
    }

    /// The single call site for activation transitions
    pub fn activate(&mut self, name: &str) -> SwitchResult<&Profile> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SwitchError::UnknownProfile(name.to_string()))?;
        self.active = Some(self.profiles[idx].name.clone());
        Ok(&self.profiles[idx])
    }

    pub fn active(&self) -> Option<&Profile> {
        self.active.as_deref().and_then(|name| self.get(name))
    }
}

impl<'de> Deserialize<'de> for ProfileSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            profiles: Vec<Profile>,
            #[serde(default)]
            active: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut set = ProfileSet::default();
        for profile in raw.profiles {
            set.insert(profile).map_err(serde::de::Error::custom)?;
        }
        if let Some(name) = raw.active {
            set.activate(&name).map_err(serde::de::Error::custom)?;
        }
        Ok(set)
    }
}
