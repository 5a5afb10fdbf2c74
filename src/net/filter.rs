use std::collections::HashSet;

use crate::domain::id::HostName;

/// The reserved naming convention that marks a server as private.
///
/// Both historical forms are supported as configuration: a plain prefix test
/// and a generated list of `count` indexed names (`prefix-0 .. prefix-(count-1)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivatePattern {
    Prefix(String),
    Indexed { prefix: String, count: u32 },
}

impl PrivatePattern {
    fn reserved_names(&self) -> Option<HashSet<HostName>> {
        match self {
            PrivatePattern::Prefix(_) => None,
            PrivatePattern::Indexed { prefix, count } => {
                Some((0..*count).map(|index| HostName::new(format!("{}-{}", prefix, index))).collect())
            }
        }
    }

    fn matches(&self, name: &HostName, reserved: Option<&HashSet<HostName>>) -> bool {
        match self {
            PrivatePattern::Prefix(prefix) => name.as_str().starts_with(prefix.as_str()),
            PrivatePattern::Indexed { .. } => reserved.map(|names| names.contains(name)).unwrap_or(false),
        }
    }
}

/// Outcome of the exclusion pipeline. The removed subsets are kept so
/// callers can report what was dropped and why, not just the survivors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub kept: Vec<HostName>,
    pub manual_excluded: Vec<HostName>,
    pub private_excluded: Vec<HostName>,
}

/// Applies the manual exclusion set and, when given, the private-name
/// pattern to the candidate list. Order of the survivors follows the
/// candidate order.
pub fn apply(candidates: Vec<HostName>, manual: &HashSet<HostName>, private: Option<&PrivatePattern>) -> FilterReport {
    let reserved = private.and_then(PrivatePattern::reserved_names);

    let mut report = FilterReport::default();

    for candidate in candidates {
        if manual.contains(&candidate) {
            report.manual_excluded.push(candidate);
        } else if private.map(|pattern| pattern.matches(&candidate, reserved.as_ref())).unwrap_or(false) {
            report.private_excluded.push(candidate);
        } else {
            report.kept.push(candidate);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<HostName> {
        raw.iter().copied().map(HostName::new).collect()
    }

    #[test]
    fn test_manual_and_prefix_exclusion() {
        let candidates = names(&["home", "n00dles", "pserv-0", "pserv-1"]);
        let manual: HashSet<HostName> = [HostName::new("home")].into_iter().collect();
        let pattern = PrivatePattern::Prefix("pserv".to_string());

        let report = apply(candidates, &manual, Some(&pattern));

        assert_eq!(report.kept, names(&["n00dles"]));
        assert_eq!(report.manual_excluded, names(&["home"]), "Manual exclusions should be reported separately");
        assert_eq!(report.private_excluded, names(&["pserv-0", "pserv-1"]), "Private exclusions should be reported separately");
    }

    #[test]
    fn test_indexed_pattern_only_matches_generated_names() {
        let candidates = names(&["pserv-0", "pserv-1", "pserv-2", "pserv-extra"]);
        let manual = HashSet::new();
        let pattern = PrivatePattern::Indexed { prefix: "pserv".to_string(), count: 2 };

        let report = apply(candidates, &manual, Some(&pattern));

        // Only pserv-0 and pserv-1 are in the generated list of 2 names.
        assert_eq!(report.private_excluded, names(&["pserv-0", "pserv-1"]));
        assert_eq!(report.kept, names(&["pserv-2", "pserv-extra"]));
    }

    #[test]
    fn test_no_private_pattern_keeps_reserved_names() {
        let candidates = names(&["n00dles", "pserv-0"]);
        let manual = HashSet::new();

        let report = apply(candidates, &manual, None);

        assert_eq!(report.kept, names(&["n00dles", "pserv-0"]));
        assert!(report.private_excluded.is_empty());
    }

    #[test]
    fn test_manual_exclusion_wins_over_private_pattern() {
        let candidates = names(&["pserv-0"]);
        let manual: HashSet<HostName> = [HostName::new("pserv-0")].into_iter().collect();
        let pattern = PrivatePattern::Prefix("pserv".to_string());

        let report = apply(candidates, &manual, Some(&pattern));

        assert_eq!(report.manual_excluded, names(&["pserv-0"]));
        assert!(report.private_excluded.is_empty());
    }
}
