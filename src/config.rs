use std::collections::{BTreeSet, HashSet};

use lazy_static::lazy_static;

use crate::domain::id::{HostName, PayloadName};
use crate::error::{Error, Result};
use crate::net::filter::PrivatePattern;
use crate::net::sizing::SizingPolicy;
use crate::ops::KillMatch;

/// The fixed starting node for all traversals.
pub const ORIGIN: &str = "home";

/// Payload deployed when no script names are given.
pub const DEFAULT_PAYLOAD: &str = "hack.js";

/// Name prefix of privately purchased servers.
pub const PRIVATE_PREFIX: &str = "pserv";

lazy_static! {
    /// Servers never touched by deploy/remove, regardless of reachability.
    pub static ref DEFAULT_MANUAL_EXCLUSIONS: HashSet<HostName> = [HostName::new(ORIGIN)].into_iter().collect();
}

/// Parses one hop argument. Non-numeric, zero and negative values are
/// configuration errors and abort the invocation before any side effect.
pub fn parse_hop(raw: &str) -> Result<u32> {
    let value: i64 = raw.trim().parse().map_err(|_| Error::Configuration(format!("'{}' is not a valid hop count", raw)))?;

    if value <= 0 {
        return Err(Error::Configuration(format!("hop count must be positive, got {}", value)));
    }

    Ok(value as u32)
}

/// Parses a comma-separated hop list such as "1,2,3" into a distance set.
pub fn parse_hops(raw: &str) -> Result<BTreeSet<u32>> {
    let mut hops = BTreeSet::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        hops.insert(parse_hop(part)?);
    }

    if hops.is_empty() {
        return Err(Error::Configuration(format!("'{}' contains no hop counts", raw)));
    }

    Ok(hops)
}

/// Splits a comma-separated script list, falling back to the default payload
/// when the list is empty.
pub fn parse_scripts(raw: &str) -> Vec<PayloadName> {
    let scripts: Vec<PayloadName> = raw.split(',').map(str::trim).filter(|part| !part.is_empty()).map(PayloadName::new).collect();

    if scripts.is_empty() {
        vec![PayloadName::new(DEFAULT_PAYLOAD)]
    } else {
        scripts
    }
}

/// Everything the deploy operation needs, validated at the boundary. The
/// core never sees raw argument strings.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub origin: HostName,
    pub max_hop: u32,
    pub scripts: Vec<PayloadName>,
    pub hack_target: Option<HostName>,
    pub manual_exclusions: HashSet<HostName>,
    pub private_pattern: Option<PrivatePattern>,
    pub policy: SizingPolicy,
    pub kill_match: KillMatch,
}

impl DeployConfig {
    pub fn from_args(max_hop: &str, scripts: &str, exclude_private: bool, hack_target: Option<String>) -> Result<DeployConfig> {
        Ok(DeployConfig {
            origin: HostName::new(ORIGIN),
            max_hop: parse_hop(max_hop)?,
            scripts: parse_scripts(scripts),
            hack_target: hack_target.map(HostName::new),
            manual_exclusions: DEFAULT_MANUAL_EXCLUSIONS.clone(),
            private_pattern: exclude_private.then(|| PrivatePattern::Prefix(PRIVATE_PREFIX.to_string())),
            policy: SizingPolicy::Table,
            kill_match: KillMatch::FileAndArgs,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RemoveConfig {
    pub origin: HostName,
    pub max_hop: u32,
    pub scripts: Vec<PayloadName>,
    pub manual_exclusions: HashSet<HostName>,
    pub private_pattern: Option<PrivatePattern>,
    pub kill_match: KillMatch,
}

impl RemoveConfig {
    pub fn from_args(max_hop: &str, scripts: &str, exclude_private: bool) -> Result<RemoveConfig> {
        Ok(RemoveConfig {
            origin: HostName::new(ORIGIN),
            max_hop: parse_hop(max_hop)?,
            scripts: parse_scripts(scripts),
            manual_exclusions: DEFAULT_MANUAL_EXCLUSIONS.clone(),
            private_pattern: exclude_private.then(|| PrivatePattern::Prefix(PRIVATE_PREFIX.to_string())),
            kill_match: KillMatch::FileAndArgs,
        })
    }
}

#[derive(Debug, Clone)]
pub struct InfoConfig {
    pub origin: HostName,
    pub hops: BTreeSet<u32>,
    pub target: Option<HostName>,
}

impl InfoConfig {
    pub fn from_args(hops: &str, target: Option<String>) -> Result<InfoConfig> {
        Ok(InfoConfig { origin: HostName::new(ORIGIN), hops: parse_hops(hops)?, target: target.map(HostName::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hop_accepts_positive_integers() {
        assert_eq!(parse_hop("3").unwrap(), 3);
        assert_eq!(parse_hop(" 1 ").unwrap(), 1);
    }

    #[test]
    fn test_parse_hop_rejects_invalid_values() {
        assert!(parse_hop("abc").is_err(), "Non-numeric hop must be rejected");
        assert!(parse_hop("0").is_err(), "Zero hop must be rejected");
        assert!(parse_hop("-2").is_err(), "Negative hop must be rejected");
        assert!(parse_hop("").is_err());
    }

    #[test]
    fn test_parse_hops_builds_a_distance_set() {
        let hops = parse_hops("3,1,2,1").unwrap();
        assert_eq!(hops.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_hops_rejects_empty_and_partial_garbage() {
        assert!(parse_hops("").is_err(), "Empty hop list is a configuration error");
        assert!(parse_hops(",,").is_err());
        assert!(parse_hops("1,x").is_err(), "One bad entry poisons the whole list");
    }

    #[test]
    fn test_parse_scripts_defaults_to_payload() {
        assert_eq!(parse_scripts(""), vec![PayloadName::new(DEFAULT_PAYLOAD)]);
        assert_eq!(parse_scripts("a.js, b.js"), vec![PayloadName::new("a.js"), PayloadName::new("b.js")]);
    }

    #[test]
    fn test_deploy_config_private_pattern_toggle() {
        let without = DeployConfig::from_args("1", "", false, None).unwrap();
        assert!(without.private_pattern.is_none());

        let with = DeployConfig::from_args("2", "", true, Some("n00dles".to_string())).unwrap();
        assert_eq!(with.private_pattern, Some(PrivatePattern::Prefix(PRIVATE_PREFIX.to_string())));
        assert_eq!(with.hack_target, Some(HostName::new("n00dles")));
        assert_eq!(with.max_hop, 2);
    }
}
