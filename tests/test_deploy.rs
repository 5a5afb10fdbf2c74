use netsweep::api::network_dto::{NetworkDto, ProcessDto, ScriptRamDto, ServerDto};
use netsweep::config::DeployConfig;
use netsweep::domain::id::{HostName, PayloadName};
use netsweep::host::GameHost;
use netsweep::host::sim_host::SimHost;
use netsweep::net::sizing::SizingPolicy;
use netsweep::ops::deploy;

fn server(name: &str, connections: &[&str], ports_required: u32, max_ram: f64) -> ServerDto {
    ServerDto {
        name: name.to_string(),
        connections: connections.iter().map(|c| c.to_string()).collect(),
        root_access: false,
        ports_required,
        max_ram,
        used_ram: 0.0,
        cores: 1,
        required_hacking_skill: 1,
        security_level: 1.0,
        min_security_level: 1.0,
        money_available: 0.0,
        max_money: 0.0,
        growth: 1,
        hack_chance: 0.5,
        hack_time_ms: 0.0,
        grow_time_ms: 0.0,
        weaken_time_ms: 0.0,
        files: Vec::new(),
        processes: Vec::new(),
    }
}

fn deploy_config(max_hop: &str, hack_target: Option<&str>) -> DeployConfig {
    DeployConfig::from_args(max_hop, "hack.js", false, hack_target.map(str::to_string)).expect("fixture config should be valid")
}

#[test]
fn test_deploy_unlocks_and_launches_within_hop_range() {
    // home -> a -> b, both open servers with no port requirement.
    let dto = NetworkDto {
        origin: None,
        port_openers: Vec::new(),
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 2.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), server("a", &["home", "b"], 0, 16.0), server("b", &["a"], 0, 32.0)],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let report = deploy::run(&host, &deploy_config("2", Some("n00dles"))).unwrap();

    assert_eq!(report.launched.len(), 2, "Both reachable servers should receive the payload");

    let a = &report.launched[0];
    assert_eq!(a.host, HostName::new("a"));
    assert_eq!(a.threads, 6, "Table policy fixes 16 GB servers at 6 threads");

    let b = &report.launched[1];
    assert_eq!(b.host, HostName::new("b"));
    assert_eq!(b.threads, 12, "Table policy fixes 32 GB servers at 12 threads");

    assert!(host.has_root_access(&HostName::new("a")), "Deploy must have nuked 'a'");

    let processes = host.running_processes(&HostName::new("a"));
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].args, vec!["n00dles".to_string()], "Hack target must be forwarded to the payload");
}

#[test]
fn test_deploy_applies_openers_before_nuking() {
    let dto = NetworkDto {
        origin: None,
        port_openers: vec!["BruteSSH.exe".to_string()],
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 2.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), server("a", &["home"], 1, 16.0)],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let report = deploy::run(&host, &deploy_config("1", None)).unwrap();

    assert_eq!(report.launched.len(), 1);
    assert!(report.capability_shortfalls.is_empty());
    assert!(host.has_root_access(&HostName::new("a")));
}

#[test]
fn test_capability_shortfall_skips_the_whole_server() {
    // 'a' needs 2 ports but only BruteSSH is available.
    let dto = NetworkDto {
        origin: None,
        port_openers: vec!["BruteSSH.exe".to_string()],
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 2.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), server("a", &["home"], 2, 16.0)],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let report = deploy::run(&host, &deploy_config("1", None)).unwrap();

    assert!(report.launched.is_empty(), "No partial deploy on a locked server");
    assert_eq!(report.capability_shortfalls, vec![HostName::new("a")]);
    assert!(!host.has_root_access(&HostName::new("a")));
}

#[test]
fn test_oversized_payload_is_a_resource_shortfall() {
    // 64 GB server, 100 GB payload: the table policy divides down to 0.
    let dto = NetworkDto {
        origin: None,
        port_openers: Vec::new(),
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 100.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), server("a", &["home"], 0, 64.0)],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let report = deploy::run(&host, &deploy_config("1", None)).unwrap();

    assert!(report.launched.is_empty());
    assert_eq!(report.resource_shortfalls, vec![(HostName::new("a"), PayloadName::new("hack.js"))]);
    assert!(host.running_processes(&HostName::new("a")).is_empty(), "A zero thread count must never issue a run request");
}

#[test]
fn test_available_capacity_policy_sizes_against_free_ram() {
    let mut busy = server("a", &["home"], 0, 32.0);
    busy.used_ram = 16.0;

    let dto = NetworkDto {
        origin: None,
        port_openers: Vec::new(),
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 8.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), busy],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let mut config = deploy_config("1", None);
    config.policy = SizingPolicy::AvailableCapacity;

    let report = deploy::run(&host, &config).unwrap();

    assert_eq!(report.launched.len(), 1);
    assert_eq!(report.launched[0].threads, 2, "floor((32 - 16) / 8) threads");
}

#[test]
fn test_private_servers_are_excluded_when_configured() {
    let dto = NetworkDto {
        origin: None,
        port_openers: Vec::new(),
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 2.0 }],
        servers: vec![server("home", &["a", "pserv-0"], 0, 8.0), server("a", &["home"], 0, 16.0), server("pserv-0", &["home"], 0, 16.0)],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let config = DeployConfig::from_args("1", "hack.js", true, None).unwrap();
    let report = deploy::run(&host, &config).unwrap();

    assert_eq!(report.filter.private_excluded, vec![HostName::new("pserv-0")]);
    assert_eq!(report.launched.len(), 1);
    assert_eq!(report.launched[0].host, HostName::new("a"));
}

#[test]
fn test_redeploy_replaces_the_matching_running_instance() {
    let mut running = server("a", &["home"], 0, 16.0);
    running.root_access = true;
    running.used_ram = 2.0;
    running.files = vec!["hack.js".to_string()];
    running.processes = vec![ProcessDto { file: "hack.js".to_string(), threads: 1, args: vec!["n00dles".to_string()] }];

    let dto = NetworkDto {
        origin: None,
        port_openers: Vec::new(),
        script_ram: vec![ScriptRamDto { file: "hack.js".to_string(), ram: 2.0 }],
        servers: vec![server("home", &["a"], 0, 8.0), running],
    };
    let host = SimHost::from_dto(dto).unwrap().without_pauses();

    let report = deploy::run(&host, &deploy_config("1", Some("n00dles"))).unwrap();

    assert_eq!(report.launched.len(), 1);

    let processes = host.running_processes(&HostName::new("a"));
    assert_eq!(processes.len(), 1, "The old instance with matching arguments must be stopped first");
    assert_eq!(processes[0].pid, report.launched[0].pid);
    assert_eq!(processes[0].threads, 6);
}
