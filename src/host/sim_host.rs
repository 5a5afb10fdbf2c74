use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::api::network_dto::NetworkDto;
use crate::domain::id::{HostName, PayloadName};
use crate::error::{Error, Result};
use crate::host::{GameHost, PortOpener, ProcessInfo, ServerStats};

/// One server inside the simulated network.
#[derive(Debug)]
struct SimServer {
    connections: Vec<HostName>,
    root_access: bool,
    ports_required: u32,
    open_ports: HashSet<PortOpener>,
    max_ram: f64,
    used_ram: f64,
    cores: u32,
    required_hacking_skill: i64,
    security_level: f64,
    min_security_level: f64,
    money_available: f64,
    max_money: f64,
    growth: i64,
    hack_chance: f64,
    hack_time_ms: f64,
    grow_time_ms: f64,
    weaken_time_ms: f64,
    files: Vec<PayloadName>,
    processes: Vec<ProcessInfo>,
}

#[derive(Debug)]
struct SimState {
    servers: HashMap<HostName, SimServer>,
    next_pid: u32,
}

/// In-memory implementation of [`GameHost`] built from a network snapshot.
///
/// The binary runs every command against one of these; tests drive the ops
/// against small hand-built snapshots. All mutation goes through the interior
/// `Mutex` so the trait methods can take `&self` like the real host API does.
#[derive(Debug)]
pub struct SimHost {
    state: Mutex<SimState>,
    openers: HashSet<PortOpener>,
    script_ram: HashMap<PayloadName, f64>,
    origin: HostName,
    realtime_pauses: bool,
}

impl SimHost {
    pub fn from_dto(dto: NetworkDto) -> Result<SimHost> {
        let origin = HostName::new(dto.origin.as_deref().unwrap_or(crate::config::ORIGIN));

        let known: HashSet<HostName> = dto.servers.iter().map(|s| HostName::new(&s.name)).collect();

        if !known.contains(&origin) {
            return Err(Error::UnknownHost(origin));
        }

        let mut openers = HashSet::new();
        for tool in &dto.port_openers {
            match PortOpener::from_tool_name(tool) {
                Some(opener) => {
                    openers.insert(opener);
                }
                None => log::warn!("Ignoring unknown port opener tool '{}' in snapshot.", tool),
            }
        }

        let script_ram: HashMap<PayloadName, f64> = dto.script_ram.iter().map(|s| (PayloadName::new(&s.file), s.ram)).collect();

        let mut servers: HashMap<HostName, SimServer> = HashMap::new();
        let mut next_pid: u32 = 1;

        for server_dto in dto.servers {
            let name = HostName::new(&server_dto.name);

            let mut connections: Vec<HostName> = Vec::new();
            for connection in &server_dto.connections {
                let connection_id = HostName::new(connection);
                if known.contains(&connection_id) {
                    connections.push(connection_id);
                } else {
                    log::warn!("Server '{}' references unknown neighbor '{}'. Dropping the edge.", name, connection);
                }
            }

            let mut processes = Vec::new();
            for process in &server_dto.processes {
                processes.push(ProcessInfo {
                    filename: PayloadName::new(&process.file),
                    threads: process.threads,
                    args: process.args.clone(),
                    pid: next_pid,
                });
                next_pid += 1;
            }

            let server = SimServer {
                connections,
                root_access: server_dto.root_access,
                ports_required: server_dto.ports_required,
                open_ports: HashSet::new(),
                max_ram: server_dto.max_ram,
                used_ram: server_dto.used_ram,
                cores: server_dto.cores,
                required_hacking_skill: server_dto.required_hacking_skill,
                security_level: server_dto.security_level,
                min_security_level: server_dto.min_security_level,
                money_available: server_dto.money_available,
                max_money: server_dto.max_money,
                growth: server_dto.growth,
                hack_chance: server_dto.hack_chance,
                hack_time_ms: server_dto.hack_time_ms,
                grow_time_ms: server_dto.grow_time_ms,
                weaken_time_ms: server_dto.weaken_time_ms,
                files: server_dto.files.iter().map(PayloadName::new).collect(),
                processes,
            };

            if servers.insert(name.clone(), server).is_some() {
                log::warn!("Duplicate server '{}' in snapshot. Keeping the last definition.", name);
            }
        }

        Ok(SimHost {
            state: Mutex::new(SimState { servers, next_pid }),
            openers,
            script_ram,
            origin,
            realtime_pauses: true,
        })
    }

    /// Disables the voluntary pauses. Used by tests so they do not wait on
    /// the kill-settle and print-readability sleeps.
    pub fn without_pauses(mut self) -> SimHost {
        self.realtime_pauses = false;
        self
    }

    pub fn origin(&self) -> &HostName {
        &self.origin
    }

    fn with_server<R>(&self, host: &HostName, f: impl FnOnce(&mut SimServer) -> R) -> Option<R> {
        let mut state = self.state.lock().expect("SimHost state lock poisoned");
        state.servers.get_mut(host).map(f)
    }

    fn footprint_of(&self, script: &PayloadName) -> f64 {
        self.script_ram.get(script).copied().unwrap_or(0.0)
    }
}

impl GameHost for SimHost {
    fn scan(&self, host: &HostName) -> Vec<HostName> {
        self.with_server(host, |server| server.connections.clone()).unwrap_or_default()
    }

    fn has_root_access(&self, host: &HostName) -> bool {
        self.with_server(host, |server| server.root_access).unwrap_or(false)
    }

    fn num_ports_required(&self, host: &HostName) -> u32 {
        self.with_server(host, |server| server.ports_required).unwrap_or(u32::MAX)
    }

    fn opener_available(&self, opener: PortOpener) -> bool {
        self.openers.contains(&opener)
    }

    fn open_port(&self, opener: PortOpener, host: &HostName) -> bool {
        if !self.openers.contains(&opener) {
            return false;
        }

        self.with_server(host, |server| {
            server.open_ports.insert(opener);
            true
        })
        .unwrap_or(false)
    }

    fn nuke(&self, host: &HostName) -> bool {
        self.with_server(host, |server| {
            if server.open_ports.len() as u32 >= server.ports_required {
                server.root_access = true;
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }

    fn max_ram(&self, host: &HostName) -> f64 {
        self.with_server(host, |server| server.max_ram).unwrap_or(0.0)
    }

    fn used_ram(&self, host: &HostName) -> f64 {
        self.with_server(host, |server| server.used_ram).unwrap_or(0.0)
    }

    fn script_ram(&self, script: &PayloadName) -> f64 {
        self.footprint_of(script)
    }

    fn copy_file(&self, script: &PayloadName, host: &HostName) -> bool {
        self.with_server(host, |server| {
            if !server.files.contains(script) {
                server.files.push(script.clone());
            }
            true
        })
        .unwrap_or(false)
    }

    fn list_files(&self, host: &HostName) -> Vec<PayloadName> {
        self.with_server(host, |server| server.files.clone()).unwrap_or_default()
    }

    fn running_processes(&self, host: &HostName) -> Vec<ProcessInfo> {
        self.with_server(host, |server| server.processes.clone()).unwrap_or_default()
    }

    fn exec(&self, script: &PayloadName, host: &HostName, threads: u32, args: &[String]) -> Option<u32> {
        if threads == 0 {
            return None;
        }

        let footprint = self.footprint_of(script);

        let mut state = self.state.lock().expect("SimHost state lock poisoned");
        let pid = state.next_pid;
        let server = state.servers.get_mut(host)?;

        if !server.files.contains(script) {
            return None;
        }

        let cost = footprint * threads as f64;
        if server.used_ram + cost > server.max_ram {
            return None;
        }

        server.used_ram += cost;
        server.processes.push(ProcessInfo { filename: script.clone(), threads, args: args.to_vec(), pid });
        state.next_pid += 1;

        Some(pid)
    }

    fn script_kill(&self, script: &PayloadName, host: &HostName) -> bool {
        let footprint = self.footprint_of(script);

        self.with_server(host, |server| {
            let mut removed_threads: u32 = 0;
            server.processes.retain(|process| {
                if process.filename == *script {
                    removed_threads += process.threads;
                    false
                } else {
                    true
                }
            });

            if removed_threads > 0 {
                server.used_ram = (server.used_ram - footprint * removed_threads as f64).max(0.0);
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }

    fn kill(&self, script: &PayloadName, host: &HostName, args: &[String]) -> bool {
        let footprint = self.footprint_of(script);

        self.with_server(host, |server| {
            let position = server.processes.iter().position(|process| process.filename == *script && process.args == args);

            match position {
                Some(index) => {
                    let process = server.processes.remove(index);
                    server.used_ram = (server.used_ram - footprint * process.threads as f64).max(0.0);
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }

    fn delete_file(&self, script: &PayloadName, host: &HostName) -> bool {
        self.with_server(host, |server| {
            // The host refuses to delete a file that is still running.
            if server.processes.iter().any(|process| process.filename == *script) {
                return false;
            }

            let before = server.files.len();
            server.files.retain(|file| file != script);
            server.files.len() < before
        })
        .unwrap_or(false)
    }

    fn server_stats(&self, host: &HostName) -> Option<ServerStats> {
        self.with_server(host, |server| ServerStats {
            root_access: server.root_access,
            required_hacking_skill: server.required_hacking_skill,
            security_level: server.security_level,
            min_security_level: server.min_security_level,
            money_available: server.money_available,
            max_money: server.max_money,
            used_ram: server.used_ram,
            max_ram: server.max_ram,
            ports_required: server.ports_required,
            cores: server.cores,
            hack_time_ms: server.hack_time_ms,
            grow_time_ms: server.grow_time_ms,
            weaken_time_ms: server.weaken_time_ms,
            growth: server.growth,
            hack_chance: server.hack_chance,
        })
    }

    fn sleep(&self, millis: u64) {
        if self.realtime_pauses {
            thread::sleep(Duration::from_millis(millis));
        }
    }
}
