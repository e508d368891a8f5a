use std::net::{IpAddr, Ipv4Addr};

/// Construction and setup failures. Protocol errors at runtime never reach
/// this type; they are handled by the state machines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid OSPF version {0}")]
    Version(u8),
    #[error("invalid router id {0}")]
    RouterId(Ipv4Addr),
    #[error("address {address} cannot be used with OSPFv{version}")]
    AddressFamily { address: IpAddr, version: u8 },
    #[error("interface {name}: invalid {field} {value}")]
    Parameter {
        name: String,
        field: &'static str,
        value: u32,
    },
    #[error("interface {0} not found")]
    InterfaceNotFound(String),
    #[error("failed to read config: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
