use colored::Colorize;

use crate::config::InfoConfig;
use crate::domain::id::HostName;
use crate::error::{Error, Result};
use crate::host::{GameHost, ServerStats};
use crate::net::traversal::{DepthMode, path_to, traverse};

/// Pause between printed info blocks for readability.
const BLOCK_PAUSE_MS: u64 = 250;

#[derive(Debug, Default)]
pub struct InfoReport {
    pub blocks: Vec<(HostName, ServerStats)>,
    /// Shortest path from origin to the named target, when one was given.
    pub path: Option<Vec<HostName>>,
    /// Set instead of `path` when the named target could not be reached.
    pub unreachable: Option<HostName>,
}

/// Prints the diagnostic attribute block for every server at the configured
/// hop distances, or for one named server plus its path from the origin.
pub fn run(host: &dyn GameHost, config: &InfoConfig) -> Result<InfoReport> {
    match &config.target {
        Some(target) => run_for_target(host, config, target),
        None => run_for_hops(host, config),
    }
}

fn run_for_target(host: &dyn GameHost, config: &InfoConfig, target: &HostName) -> Result<InfoReport> {
    let path = match path_to(host, &config.origin, target) {
        Ok(path) => path,
        Err(Error::UnreachableTarget(name)) => {
            log::warn!("Target '{}' is not reachable from '{}'.", name, config.origin);
            return Ok(InfoReport { unreachable: Some(name), ..InfoReport::default() });
        }
        Err(other) => return Err(other),
    };

    let hops = path.len().saturating_sub(1);
    let route: Vec<&str> = path.iter().map(|name| name.as_str()).collect();
    println!("Path to {} ({} hops): {}", target.as_str().bold(), hops, route.join(" -> "));

    let mut report = InfoReport { path: Some(path), ..InfoReport::default() };
    print_stats_block(host, target, &mut report);

    Ok(report)
}

fn run_for_hops(host: &dyn GameHost, config: &InfoConfig) -> Result<InfoReport> {
    let candidates = traverse(host, &config.origin, &DepthMode::Exact(config.hops.clone()))?;

    log::info!("Found {} servers at hop distances {:?}.", candidates.len(), config.hops);

    let mut report = InfoReport::default();

    for (index, server) in candidates.iter().enumerate() {
        if index > 0 {
            host.sleep(BLOCK_PAUSE_MS);
        }
        print_stats_block(host, server, &mut report);
    }

    Ok(report)
}

fn print_stats_block(host: &dyn GameHost, server: &HostName, report: &mut InfoReport) {
    let Some(stats) = host.server_stats(server) else {
        log::warn!("No attributes available for '{}'. Skipping.", server);
        return;
    };

    let root = if stats.root_access { "yes".green() } else { "no".red() };

    println!();
    println!("=== {} ===", server.as_str().bold());
    println!("  Root access:        {}", root);
    println!("  Required skill:     {}", stats.required_hacking_skill);
    println!("  Security:           {:.2} (min {:.2})", stats.security_level, stats.min_security_level);
    println!("  Money:              {:.2} / {:.2}", stats.money_available, stats.max_money);
    println!("  RAM:                {:.2} / {:.2} GB used", stats.used_ram, stats.max_ram);
    println!("  Ports required:     {}", stats.ports_required);
    println!("  Cores:              {}", stats.cores);
    println!("  Hack time:          {:.0} ms", stats.hack_time_ms);
    println!("  Grow time:          {:.0} ms", stats.grow_time_ms);
    println!("  Weaken time:        {:.0} ms", stats.weaken_time_ms);
    println!("  Growth:             {}", stats.growth);
    println!("  Hack chance:        {:.2}%", stats.hack_chance * 100.0);

    report.blocks.push((server.clone(), stats));
}
