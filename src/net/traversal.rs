use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::domain::id::HostName;
use crate::error::{Error, Result};
use crate::host::GameHost;

/// Which hop distances a traversal should emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthMode {
    /// Emit exactly the servers whose shortest distance is in the set.
    Exact(BTreeSet<u32>),
    /// Emit every server between 1 and the given maximum hop, inclusive.
    UpTo(u32),
}

impl DepthMode {
    /// Rejects modes that can never emit anything. Checked before any
    /// traversal so a bad configuration causes no host calls at all.
    pub fn validate(&self) -> Result<()> {
        match self {
            DepthMode::Exact(depths) if depths.is_empty() => Err(Error::Configuration("the hop set is empty".to_string())),
            DepthMode::UpTo(0) => Err(Error::Configuration("the maximum hop distance must be at least 1".to_string())),
            _ => Ok(()),
        }
    }

    /// The deepest hop this mode is interested in. Expansion past it is
    /// wasted work, never wrong output.
    fn max_depth(&self) -> u32 {
        match self {
            DepthMode::Exact(depths) => depths.iter().next_back().copied().unwrap_or(0),
            DepthMode::UpTo(max) => *max,
        }
    }

    fn matches(&self, depth: u32) -> bool {
        match self {
            DepthMode::Exact(depths) => depths.contains(&depth),
            DepthMode::UpTo(max) => depth >= 1 && depth <= *max,
        }
    }
}

/// Breadth-first traversal from `origin`, emitting every server whose
/// shortest hop distance satisfies `mode`.
///
/// Emission order is BFS discovery order (FIFO), not sorted order. The
/// visited set is seeded with the origin, so the origin is only emitted when
/// `mode` explicitly contains depth 0, and duplicate neighbor entries from
/// the host are silently deduplicated.
pub fn traverse(host: &dyn GameHost, origin: &HostName, mode: &DepthMode) -> Result<Vec<HostName>> {
    mode.validate()?;

    let max_depth = mode.max_depth();

    let mut visited: HashSet<HostName> = HashSet::new();
    visited.insert(origin.clone());

    let mut queue: VecDeque<(HostName, u32)> = VecDeque::new();
    queue.push_back((origin.clone(), 0));

    let mut found: Vec<HostName> = Vec::new();

    while let Some((current, depth)) = queue.pop_front() {
        if mode.matches(depth) {
            found.push(current.clone());
        }

        if depth >= max_depth {
            continue;
        }

        for neighbor in host.scan(&current) {
            if visited.insert(neighbor.clone()) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    log::debug!("Traversal from '{}' found {} servers within {} hops.", origin, found.len(), max_depth);

    Ok(found)
}

/// Shortest path from `origin` to `target`, inclusive of both endpoints.
///
/// Each queue entry carries the full path discovered so far; the first time
/// the target is dequeued its carried path is the answer. Ties between
/// equal-length paths follow whatever neighbor order the host returns.
/// An unreachable target is an [`Error::UnreachableTarget`], distinct from
/// any valid path (a valid path always starts with the origin).
pub fn path_to(host: &dyn GameHost, origin: &HostName, target: &HostName) -> Result<Vec<HostName>> {
    let mut visited: HashSet<HostName> = HashSet::new();
    visited.insert(origin.clone());

    let mut queue: VecDeque<Vec<HostName>> = VecDeque::new();
    queue.push_back(vec![origin.clone()]);

    while let Some(path) = queue.pop_front() {
        let current = path.last().expect("queued paths always contain at least the origin");

        if current == target {
            return Ok(path);
        }

        for neighbor in host.scan(current) {
            if visited.insert(neighbor.clone()) {
                let mut extended = path.clone();
                extended.push(neighbor);
                queue.push_back(extended);
            }
        }
    }

    log::debug!("NoPathFound: {} => {}", origin, target);

    Err(Error::UnreachableTarget(target.clone()))
}
