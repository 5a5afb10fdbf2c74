use std::fmt::Debug;

use crate::domain::id::{HostName, PayloadName};

pub mod sim_host;

/// The fixed set of port-opener tools the host may provide. Each is either
/// available for the whole run or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortOpener {
    BruteSsh,
    FtpCrack,
    RelaySmtp,
    HttpWorm,
    SqlInject,
}

impl PortOpener {
    pub const ALL: [PortOpener; 5] =
        [PortOpener::BruteSsh, PortOpener::FtpCrack, PortOpener::RelaySmtp, PortOpener::HttpWorm, PortOpener::SqlInject];

    /// The program file name the host knows this tool by.
    pub fn tool_name(&self) -> &'static str {
        match self {
            PortOpener::BruteSsh => "BruteSSH.exe",
            PortOpener::FtpCrack => "FTPCrack.exe",
            PortOpener::RelaySmtp => "relaySMTP.exe",
            PortOpener::HttpWorm => "HTTPWorm.exe",
            PortOpener::SqlInject => "SQLInject.exe",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<PortOpener> {
        PortOpener::ALL.into_iter().find(|opener| opener.tool_name().eq_ignore_ascii_case(name))
    }
}

/// A process currently running on a server, as recorded by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub filename: PayloadName,
    pub threads: u32,
    pub args: Vec<String>,
    pub pid: u32,
}

/// The fixed attribute set `serverinfo` prints for one server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerStats {
    pub root_access: bool,
    pub required_hacking_skill: i64,
    pub security_level: f64,
    pub min_security_level: f64,
    pub money_available: f64,
    pub max_money: f64,
    pub used_ram: f64,
    pub max_ram: f64,
    pub ports_required: u32,
    pub cores: u32,
    pub hack_time_ms: f64,
    pub grow_time_ms: f64,
    pub weaken_time_ms: f64,
    pub growth: i64,
    /// Success probability in the range 0.0..=1.0.
    pub hack_chance: f64,
}

/// The external host runtime every command runs against.
///
/// Topology, RAM accounting, the privilege model and process lifecycle are
/// all owned and enforced behind this trait; the crate only consumes it.
/// Nothing returned here is cached across invocations.
pub trait GameHost: Debug + Send + Sync {
    /// Directly adjacent servers of `host`. May contain duplicates.
    fn scan(&self, host: &HostName) -> Vec<HostName>;

    fn has_root_access(&self, host: &HostName) -> bool;
    fn num_ports_required(&self, host: &HostName) -> u32;

    /// Whether the given opener tool is present on the origin.
    fn opener_available(&self, opener: PortOpener) -> bool;
    /// Applies an opener tool against `host`. Returns false if the host
    /// refused (tool missing, unknown server).
    fn open_port(&self, opener: PortOpener, host: &HostName) -> bool;
    /// Finalizes privilege elevation once enough ports are open.
    fn nuke(&self, host: &HostName) -> bool;

    fn max_ram(&self, host: &HostName) -> f64;
    fn used_ram(&self, host: &HostName) -> f64;
    /// RAM footprint of a payload file, in the host's capacity units.
    fn script_ram(&self, script: &PayloadName) -> f64;

    /// Copies a payload onto `host`, overwriting any same-named file.
    fn copy_file(&self, script: &PayloadName, host: &HostName) -> bool;
    fn list_files(&self, host: &HostName) -> Vec<PayloadName>;
    fn running_processes(&self, host: &HostName) -> Vec<ProcessInfo>;

    /// Requests execution; `None` means the host refused the run request.
    fn exec(&self, script: &PayloadName, host: &HostName, threads: u32, args: &[String]) -> Option<u32>;

    /// Stops every running instance of `script` on `host`, regardless of
    /// invocation arguments.
    fn script_kill(&self, script: &PayloadName, host: &HostName) -> bool;
    /// Stops the single instance of `script` on `host` whose recorded
    /// invocation arguments match `args` exactly.
    fn kill(&self, script: &PayloadName, host: &HostName, args: &[String]) -> bool;

    fn delete_file(&self, script: &PayloadName, host: &HostName) -> bool;

    /// Full attribute snapshot for diagnostics, or `None` for an unknown server.
    fn server_stats(&self, host: &HostName) -> Option<ServerStats>;

    /// Voluntary pause. The only timing dependency in the whole crate.
    fn sleep(&self, millis: u64);
}
