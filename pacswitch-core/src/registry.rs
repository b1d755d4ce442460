//! Profile registry: rule-group key -> fixed-proxy endpoint lookup.

use crate::profile::{Profile, ProfileKind, ProxyEndpoint};

/// Find the fixed-proxy endpoint a rule-group key refers to.
///
/// Names compare case-insensitively. Profiles of any other kind do not
/// resolve: a rule group can only target a fixed proxy, never another
/// switch profile (no chained resolution, so no reference cycles).
pub fn resolve<'a>(name: &str, profiles: &'a [Profile]) -> Option<&'a ProxyEndpoint> {
    profiles
        .iter()
        .find(|p| p.kind == ProfileKind::FixedProxy && p.name.eq_ignore_ascii_case(name))
        .and_then(|p| p.endpoint.as_ref())
}
