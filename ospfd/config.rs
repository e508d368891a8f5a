use std::net::Ipv4Addr;
use std::path::Path;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetType {
    #[default]
    Broadcast,
    PointToPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InterfaceConfig {
    pub name: String,
    pub area: Ipv4Addr,
    pub version: u8,
    /// OSPFv3 expects the link-local address here.
    pub address: IpNet,
    pub network: NetType,
    pub priority: u8,
    pub hello_interval: u16,
    pub dead_interval: u32,
    pub retransmit_interval: u16,
    pub transmit_delay: u16,
    pub mtu: u16,
    pub instance_id: u8,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            area: Ipv4Addr::UNSPECIFIED,
            version: 2,
            address: IpNet::default(),
            network: NetType::Broadcast,
            priority: 1,
            hello_interval: 10,
            dead_interval: 40,
            retransmit_interval: 5,
            transmit_delay: 1,
            mtu: 1500,
            instance_id: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouterConfig {
    pub router_id: Ipv4Addr,
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
}

impl RouterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_with_defaults() {
        let config = RouterConfig::parse(
            r#"
router-id: 1.1.1.1
interfaces:
  - name: eth0
    address: 10.0.0.1/24
  - name: eth1
    version: 3
    area: 0.0.0.1
    address: fe80::1/64
    network: point-to-point
    priority: 0
    hello-interval: 5
    dead-interval: 20
    instance-id: 2
"#,
        )
        .unwrap();
        assert_eq!(config.router_id, Ipv4Addr::new(1, 1, 1, 1));
        let eth0 = &config.interfaces[0];
        assert_eq!(eth0.version, 2);
        assert_eq!(eth0.priority, 1);
        assert_eq!(eth0.dead_interval, 40);
        assert_eq!(eth0.network, NetType::Broadcast);
        assert_eq!(eth0.address, "10.0.0.1/24".parse::<IpNet>().unwrap());
        let eth1 = &config.interfaces[1];
        assert_eq!(eth1.network, NetType::PointToPoint);
        assert_eq!(eth1.area, Ipv4Addr::new(0, 0, 0, 1));
        assert_eq!(eth1.hello_interval, 5);
        assert_eq!(eth1.instance_id, 2);
        assert_eq!(eth1.retransmit_interval, 5);
    }

    #[test]
    fn unknown_network_type_is_rejected() {
        let err = RouterConfig::parse("router-id: 1.1.1.1\ninterfaces:\n  - name: x\n    network: nbma\n");
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
