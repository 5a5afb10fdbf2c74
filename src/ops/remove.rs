use crate::config::RemoveConfig;
use crate::domain::id::{HostName, PayloadName};
use crate::error::Result;
use crate::host::GameHost;
use crate::net::filter::{self, FilterReport};
use crate::net::traversal::{DepthMode, traverse};
use crate::ops::KillMatch;

/// Pause after issuing kill requests so they take effect before deletion.
const KILL_SETTLE_MS: u64 = 100;

#[derive(Debug, Default)]
pub struct RemoveReport {
    pub filter: FilterReport,
    pub killed: Vec<(HostName, PayloadName, Vec<String>)>,
    pub deleted: Vec<(HostName, PayloadName)>,
    pub failed_deletes: Vec<(HostName, PayloadName)>,
}

/// Stops and deletes every configured payload on reachable servers within
/// the hop range.
///
/// Deletion is attempted even when no matching process was running, since a
/// copied file may never have been executed. A failed deletion is reported
/// once and not retried.
pub fn run(host: &dyn GameHost, config: &RemoveConfig) -> Result<RemoveReport> {
    let candidates = traverse(host, &config.origin, &DepthMode::UpTo(config.max_hop))?;
    let filtered = filter::apply(candidates, &config.manual_exclusions, config.private_pattern.as_ref());

    if !filtered.manual_excluded.is_empty() {
        log::info!("Excluded by name: {:?}", filtered.manual_excluded);
    }
    if !filtered.private_excluded.is_empty() {
        log::info!("Excluded as private servers: {:?}", filtered.private_excluded);
    }

    let targets = filtered.kept.clone();
    let mut report = RemoveReport { filter: filtered, ..RemoveReport::default() };

    for server in &targets {
        for file in host.list_files(server) {
            if !config.scripts.contains(&file) {
                continue;
            }

            remove_payload(host, server, &file, config.kill_match, &mut report);
        }
    }

    log::info!("Remove finished: {} processes stopped, {} files deleted, {} deletions failed.", report.killed.len(), report.deleted.len(), report.failed_deletes.len());

    Ok(report)
}

fn remove_payload(host: &dyn GameHost, server: &HostName, file: &PayloadName, kill_match: KillMatch, report: &mut RemoveReport) {
    let mut killed_any = false;

    match kill_match {
        KillMatch::FileOnly => {
            if host.script_kill(file, server) {
                log::info!("Stopped all instances of '{}' on '{}'.", file, server);
                report.killed.push((server.clone(), file.clone(), Vec::new()));
                killed_any = true;
            }
        }
        KillMatch::FileAndArgs => {
            for process in host.running_processes(server) {
                if process.filename != *file {
                    continue;
                }

                if host.kill(file, server, &process.args) {
                    log::info!("Stopped '{}' {:?} on '{}'.", file, process.args, server);
                    report.killed.push((server.clone(), file.clone(), process.args));
                    killed_any = true;
                } else {
                    log::warn!("Kill request for '{}' {:?} on '{}' was refused.", file, process.args, server);
                }
            }
        }
    }

    if killed_any {
        host.sleep(KILL_SETTLE_MS);
    }

    if host.delete_file(file, server) {
        log::info!("Deleted '{}' from '{}'.", file, server);
        report.deleted.push((server.clone(), file.clone()));
    } else {
        log::warn!("Could not delete '{}' from '{}'.", file, server);
        report.failed_deletes.push((server.clone(), file.clone()));
    }
}
