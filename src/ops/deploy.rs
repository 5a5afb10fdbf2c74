use crate::config::DeployConfig;
use crate::domain::id::{HostName, PayloadName};
use crate::error::{Error, Result};
use crate::host::{GameHost, PortOpener};
use crate::net::filter::{self, FilterReport};
use crate::net::sizing::thread_count;
use crate::net::traversal::{DepthMode, traverse};
use crate::ops::KillMatch;

/// One successfully issued run request.
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    pub host: HostName,
    pub script: PayloadName,
    pub threads: u32,
    pub pid: u32,
}

/// What the deploy run did, per server and payload. Every failure class is
/// recorded by name so callers can assert on outcomes instead of log text.
#[derive(Debug, Default)]
pub struct DeployReport {
    pub filter: FilterReport,
    pub launched: Vec<Launch>,
    pub capability_shortfalls: Vec<HostName>,
    pub resource_shortfalls: Vec<(HostName, PayloadName)>,
    pub action_failures: Vec<(HostName, String)>,
}

/// Copies and launches the configured payloads on every reachable, unlocked
/// server within the hop range.
///
/// Per-server failures are non-fatal: a capability shortfall skips the whole
/// server, a resource shortfall or refused run request skips that payload,
/// and processing continues. Only the upfront configuration check can abort.
pub fn run(host: &dyn GameHost, config: &DeployConfig) -> Result<DeployReport> {
    let candidates = traverse(host, &config.origin, &DepthMode::UpTo(config.max_hop))?;
    let filtered = filter::apply(candidates, &config.manual_exclusions, config.private_pattern.as_ref());

    if !filtered.manual_excluded.is_empty() {
        log::info!("Excluded by name: {:?}", filtered.manual_excluded);
    }
    if !filtered.private_excluded.is_empty() {
        log::info!("Excluded as private servers: {:?}", filtered.private_excluded);
    }

    let targets = filtered.kept.clone();
    let mut report = DeployReport { filter: filtered, ..DeployReport::default() };

    let args: Vec<String> = config.hack_target.iter().map(|target| target.to_string()).collect();

    for server in &targets {
        match unlock(host, server) {
            Ok(()) => {}
            Err(Error::CapabilityShortfall { host: name, available, required }) => {
                log::warn!("Skipping '{}': only {} of {} required port openers available.", name, available, required);
                report.capability_shortfalls.push(name);
                continue;
            }
            Err(Error::ActionFailed { host: name, action }) => {
                log::warn!("Skipping '{}': {} failed.", name, action);
                report.action_failures.push((name, action));
                continue;
            }
            Err(other) => return Err(other),
        }

        for script in &config.scripts {
            deploy_payload(host, config, server, script, &args, &mut report);
        }
    }

    log::info!(
        "Deploy finished: {} launched, {} locked, {} out of capacity.",
        report.launched.len(),
        report.capability_shortfalls.len(),
        report.resource_shortfalls.len()
    );

    Ok(report)
}

/// Applies every available opener tool and finalizes privilege elevation if
/// the count reaches the host-reported threshold. A shortfall skips the
/// server entirely; there is no partial deploy.
fn unlock(host: &dyn GameHost, server: &HostName) -> Result<()> {
    if host.has_root_access(server) {
        return Ok(());
    }

    let required = host.num_ports_required(server);

    let mut opened: u32 = 0;
    for opener in PortOpener::ALL {
        if host.opener_available(opener) && host.open_port(opener, server) {
            opened += 1;
        }
    }

    if opened < required {
        return Err(Error::CapabilityShortfall { host: server.clone(), available: opened, required });
    }

    if !host.nuke(server) {
        return Err(Error::ActionFailed { host: server.clone(), action: "nuke".to_string() });
    }

    log::info!("Gained root access on '{}' ({} ports opened).", server, opened);
    Ok(())
}

fn deploy_payload(
    host: &dyn GameHost,
    config: &DeployConfig,
    server: &HostName,
    script: &PayloadName,
    args: &[String],
    report: &mut DeployReport,
) {
    if !host.copy_file(script, server) {
        log::warn!("Could not copy '{}' to '{}'.", script, server);
        report.action_failures.push((server.clone(), format!("copy {}", script)));
        return;
    }

    stop_running_instances(host, server, script, args, config.kill_match);

    let footprint = host.script_ram(script);

    let sized = match thread_count(config.policy, host.max_ram(server), host.used_ram(server), footprint) {
        Ok(sized) => sized,
        Err(e) => {
            log::warn!("Cannot size '{}' on '{}': {}", script, server, e);
            report.resource_shortfalls.push((server.clone(), script.clone()));
            return;
        }
    };

    if sized.threads == 0 {
        log::warn!("'{}' (footprint {}) does not fit on '{}'. Skipping.", script, footprint, server);
        report.resource_shortfalls.push((server.clone(), script.clone()));
        return;
    }

    match host.exec(script, server, sized.threads, args) {
        Some(pid) => {
            log::info!("Running '{}' on '{}' with {} threads (pid {}).", script, server, sized.threads, pid);
            report.launched.push(Launch { host: server.clone(), script: script.clone(), threads: sized.threads, pid });
        }
        None => {
            log::warn!("Run request for '{}' on '{}' was refused.", script, server);
            report.action_failures.push((server.clone(), format!("exec {}", script)));
        }
    }
}

/// Stops a previously deployed instance before relaunching, so the new copy
/// replaces it instead of stacking on top.
fn stop_running_instances(host: &dyn GameHost, server: &HostName, script: &PayloadName, args: &[String], kill_match: KillMatch) {
    match kill_match {
        KillMatch::FileOnly => {
            if host.script_kill(script, server) {
                log::debug!("Stopped running instances of '{}' on '{}'.", script, server);
            }
        }
        KillMatch::FileAndArgs => {
            for process in host.running_processes(server) {
                if process.filename == *script && process.args == args {
                    host.kill(script, server, &process.args);
                    log::debug!("Stopped '{}' {:?} on '{}'.", script, process.args, server);
                }
            }
        }
    }
}
