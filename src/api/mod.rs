pub mod network_dto;
