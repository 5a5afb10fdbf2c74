use serde::Deserialize;

/// Top-level snapshot of the simulated network the host exposes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDto {
    /// The origin node all traversals start from. Defaults to "home".
    pub origin: Option<String>,

    /// Port-opener tools present on the origin, by program name
    /// (e.g. "BruteSSH.exe").
    #[serde(default)]
    pub port_openers: Vec<String>,

    /// RAM footprint per known payload file, in GB.
    #[serde(default)]
    pub script_ram: Vec<ScriptRamDto>,

    pub servers: Vec<ServerDto>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptRamDto {
    pub file: String,
    pub ram: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDto {
    pub name: String,
    pub connections: Vec<String>,

    #[serde(default)]
    pub root_access: bool,
    #[serde(default)]
    pub ports_required: u32,

    pub max_ram: f64,
    #[serde(default)]
    pub used_ram: f64,
    #[serde(default = "default_cores")]
    pub cores: u32,

    #[serde(default)]
    pub required_hacking_skill: i64,
    #[serde(default)]
    pub security_level: f64,
    #[serde(default)]
    pub min_security_level: f64,
    #[serde(default)]
    pub money_available: f64,
    #[serde(default)]
    pub max_money: f64,
    #[serde(default)]
    pub growth: i64,
    #[serde(default)]
    pub hack_chance: f64,
    #[serde(default)]
    pub hack_time_ms: f64,
    #[serde(default)]
    pub grow_time_ms: f64,
    #[serde(default)]
    pub weaken_time_ms: f64,

    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub processes: Vec<ProcessDto>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessDto {
    pub file: String,
    pub threads: u32,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_cores() -> u32 {
    1
}
