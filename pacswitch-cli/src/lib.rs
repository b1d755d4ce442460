//! CLI plumbing: argument parsing, file loading and the compile/evaluate
//! flows behind the `pacswitch` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pacswitch_core::{
    compile, registry, BypassMatcher, Directive, Profile, ProfileKind, ProfileSet, RuleMapping,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pacswitch", version, about = "Compile proxy switch rules into a PAC decision script")]
pub struct Args {
    /// Profile list file (JSON array of profiles)
    #[arg(long)]
    pub profiles: PathBuf,

    /// Rule document file (JSON, // and /* */ comments allowed)
    #[arg(long)]
    pub rules: PathBuf,

    /// Print the compiled PAC script (default when no other action is given)
    #[arg(long)]
    pub emit: bool,

    /// Evaluate the compiled rules for this host and print the directive
    #[arg(long)]
    pub host: Option<String>,

    /// With --host: evaluate against this fixed-proxy profile (honoring its
    /// bypass list) instead of the switch rules
    #[arg(long, requires = "host")]
    pub via: Option<String>,

    /// Parse and compile only, reporting clause and warning counts
    #[arg(long)]
    pub check: bool,
}

/// Load and validate the profile list
pub fn load_profiles(path: &Path) -> Result<ProfileSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading profile list {}", path.display()))?;
    let profiles: Vec<Profile> = serde_json::from_str(&text)
        .with_context(|| format!("parsing profile list {}", path.display()))?;

    let mut set = ProfileSet::default();
    for profile in profiles {
        set.insert(profile)?;
    }
    Ok(set)
}

/// Directive for a host routed through one fixed-proxy profile.
///
/// Hosts on the profile's bypass list connect directly.
pub fn evaluate_via(set: &ProfileSet, name: &str, host: &str) -> Result<Directive> {
    let profile = set
        .get(name)
        .with_context(|| format!("no profile named '{name}'"))?;
    if profile.kind != ProfileKind::FixedProxy {
        bail!("profile '{name}' is not a fixed proxy");
    }
    if BypassMatcher::new(profile.bypass_list.clone()).matches(host) {
        return Ok(Directive::Direct);
    }
    // kind was checked above, so the endpoint resolves
    let endpoint = registry::resolve(name, set.profiles())
        .with_context(|| format!("profile '{name}' has no endpoint"))?;
    Ok(endpoint.directive())
}

pub fn run(args: Args) -> Result<()> {
    for line in execute(&args)? {
        println!("{}", line);
    }
    Ok(())
}

/// Load, compile and resolve the requested actions into stdout lines.
///
/// Warnings and the `--check` summary go through `tracing` (stderr), never
/// stdout: the script and directives must stay pipeable on their own.
/// An explicit `--emit` prints the script even when combined with `--host`
/// or `--check`; with no action flags at all, emitting is the default.
fn execute(args: &Args) -> Result<Vec<String>> {
    let set = load_profiles(&args.profiles)?;
    let text = fs::read_to_string(&args.rules)
        .with_context(|| format!("reading rule document {}", args.rules.display()))?;
    let rules = RuleMapping::parse(&text)
        .with_context(|| format!("parsing rule document {}", args.rules.display()))?;

    let out = compile(&rules, set.profiles());
    for warning in &out.warnings {
        warn!("{}", warning);
    }

    let mut lines = Vec::new();

    if let Some(host) = &args.host {
        let directive = match &args.via {
            Some(via) => evaluate_via(&set, via, host)?,
            None => out.rules.evaluate(host),
        };
        lines.push(directive.to_string());
    }

    if args.check {
        info!(
            "compiled {} clauses with {} warnings",
            out.rules.clauses().len(),
            out.warnings.len()
        );
    }

    if args.emit || (args.host.is_none() && !args.check) {
        lines.push(out.script);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacswitch_core::{ProxyEndpoint, ProxyScheme};
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_validates_profiles() {
        let file = write_temp(
            r#"[
                {"name": "v2ray", "kind": "fixed_proxy",
                 "endpoint": {"scheme": "socks5", "host": "127.0.0.1", "port": 1080}}
            ]"#,
        );
        let set = load_profiles(file.path()).unwrap();
        assert!(set.get("V2RAY").is_some());
    }

    #[test]
    fn duplicate_profiles_fail_loading() {
        let file = write_temp(
            r#"[
                {"name": "a", "kind": "direct"},
                {"name": "A", "kind": "direct"}
            ]"#,
        );
        assert!(load_profiles(file.path()).is_err());
    }

    #[test]
    fn evaluate_via_honors_the_bypass_list() {
        let mut set = ProfileSet::default();
        set.insert(Profile::fixed_proxy(
            "work",
            ProxyEndpoint::new(ProxyScheme::Http, "10.0.0.1", 8080).unwrap(),
            vec!["localhost".to_string(), "*.internal.corp".to_string()],
        ))
        .unwrap();

        assert_eq!(
            evaluate_via(&set, "work", "localhost").unwrap(),
            Directive::Direct
        );
        assert_eq!(
            evaluate_via(&set, "work", "example.com").unwrap(),
            Directive::Proxy {
                host: "10.0.0.1".into(),
                port: 8080
            }
        );
    }

    fn socks_fixture() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        let profiles = write_temp(
            r#"[
                {"name": "v2ray", "kind": "fixed_proxy",
                 "endpoint": {"scheme": "socks5", "host": "127.0.0.1", "port": 1080}}
            ]"#,
        );
        let rules = write_temp(r#"{"v2ray": ["google.com"]}"#);
        (profiles, rules)
    }

    fn args(profiles: &tempfile::NamedTempFile, rules: &tempfile::NamedTempFile) -> Args {
        Args {
            profiles: profiles.path().to_path_buf(),
            rules: rules.path().to_path_buf(),
            emit: false,
            host: None,
            via: None,
            check: false,
        }
    }

    #[test]
    fn emitting_is_the_default_action() {
        let (profiles, rules) = socks_fixture();
        let lines = execute(&args(&profiles, &rules)).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("function FindProxyForURL(url, host)"));
    }

    #[test]
    fn explicit_emit_still_prints_alongside_check() {
        let (profiles, rules) = socks_fixture();
        let mut a = args(&profiles, &rules);
        a.emit = true;
        a.check = true;
        let lines = execute(&a).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("function FindProxyForURL(url, host)"));
    }

    #[test]
    fn explicit_emit_prints_after_the_host_directive() {
        let (profiles, rules) = socks_fixture();
        let mut a = args(&profiles, &rules);
        a.emit = true;
        a.host = Some("google.com".to_string());
        let lines = execute(&a).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "SOCKS5 127.0.0.1:1080");
        assert!(lines[1].starts_with("function FindProxyForURL(url, host)"));
    }

    #[test]
    fn check_alone_keeps_stdout_empty() {
        // the summary goes through tracing, never the script stream
        let (profiles, rules) = socks_fixture();
        let mut a = args(&profiles, &rules);
        a.check = true;
        let lines = execute(&a).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn evaluate_via_rejects_non_fixed_profiles() {
        let mut set = ProfileSet::with_builtins();
        set.insert(Profile::switch("auto", RuleMapping::new()))
            .unwrap();
        assert!(evaluate_via(&set, "auto", "example.com").is_err());
        assert!(evaluate_via(&set, "direct", "example.com").is_err());
    }
}
