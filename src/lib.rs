use crate::api::network_dto::NetworkDto;
use crate::error::Result;
use crate::host::sim_host::SimHost;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod loader;
pub mod logger;
pub mod net;
pub mod ops;

/// Loads a network snapshot file and builds the simulated host every
/// command runs against.
pub fn load_network(file_path: &str) -> Result<SimHost> {
    let dto: NetworkDto = parse_json_file::<NetworkDto>(file_path)?;
    log::info!("Network snapshot '{}' parsed successfully.", file_path);

    let host = SimHost::from_dto(dto)?;
    log::info!("Simulated host constructed, origin '{}'.", host.origin());

    Ok(host)
}
