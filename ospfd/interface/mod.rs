mod election;
mod listen;
mod state;
#[cfg(test)]
mod test;

pub use election::*;
pub use listen::*;
pub use state::*;

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use ospf_packet::lsa::{flood_scope, FloodScope, LsaIdentifier};
use ospf_packet::packet::options;
use ospf_packet::Version;

use crate::config::{InterfaceConfig, NetType};
use crate::constant::{AllDRouters, AllDRoutersV6, AllSPFRouters, AllSPFRoutersV6};
use crate::database::{Lsdb, LsdbScope};
use crate::error::Error;
use crate::flooding::FloodSender;
use crate::neighbor::Neighbor;
use crate::sender::Transport;
use crate::timer::Timer;
use crate::util::prefix2mask;

/// What the owning router hands to each interface it creates.
pub struct InterfaceContext {
    pub router_id: Ipv4Addr,
    /// Unique per router, allocated by the router.
    pub interface_id: u32,
    pub is_abr: bool,
    pub lsdb: Arc<Lsdb>,
    pub flooding: FloodSender,
}

pub struct Interface {
    pub name: String,
    pub interface_id: u32,
    pub version: Version,
    pub router_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    pub is_abr: bool,
    pub net_type: NetType,
    pub state: InterfaceState,
    pub address: IpAddr,
    pub prefix_len: u8,
    pub instance_id: u8,
    pub priority: u8,
    pub hello_interval: u16,
    pub dead_interval: u32,
    pub rxmt_interval: u16,
    pub transmit_delay: u16,
    pub mtu: u16,
    pub dr: Ipv4Addr,
    pub bdr: Ipv4Addr,
    /// router id -> neighbor
    pub neighbors: BTreeMap<Ipv4Addr, Neighbor>,
    pub(crate) hello_timer: Timer,
    pub(crate) wait_timer: Timer,
    pub(crate) lsdb: Arc<Lsdb>,
    pub(crate) flooding: FloodSender,
    /// Network-LSA currently originated for this link.
    pub(crate) network_lsa: Option<LsaIdentifier>,
    pub(crate) transport: Box<dyn Transport>,
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("dr", &self.dr)
            .field("bdr", &self.bdr)
            .field("neighbors", &self.neighbors.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn check(name: &str, field: &'static str, value: u32, ok: bool) -> Result<(), Error> {
    if ok {
        Ok(())
    } else {
        Err(Error::Parameter {
            name: name.to_string(),
            field,
            value,
        })
    }
}

impl Interface {
    pub fn new(
        config: &InterfaceConfig,
        ctx: InterfaceContext,
        transport: Box<dyn Transport>,
    ) -> Result<Self, Error> {
        let version = match config.version {
            2 => Version::V2,
            3 => Version::V3,
            x => return Err(Error::Version(x)),
        };
        if ctx.router_id.is_unspecified() || ctx.router_id.is_broadcast() {
            return Err(Error::RouterId(ctx.router_id));
        }
        let address = config.address.addr();
        if address.is_ipv4() != (version == Version::V2) {
            return Err(Error::AddressFamily {
                address,
                version: config.version,
            });
        }
        let name = &config.name;
        check(name, "hello-interval", config.hello_interval as u32, config.hello_interval > 0)?;
        check(
            name,
            "dead-interval",
            config.dead_interval,
            config.dead_interval > config.hello_interval as u32
                && (version == Version::V2 || config.dead_interval <= u16::MAX as u32),
        )?;
        check(
            name,
            "retransmit-interval",
            config.retransmit_interval as u32,
            config.retransmit_interval > 0,
        )?;
        check(name, "mtu", config.mtu as u32, config.mtu >= 576)?;

        Ok(Self {
            name: config.name.clone(),
            interface_id: ctx.interface_id,
            version,
            router_id: ctx.router_id,
            area_id: config.area,
            is_abr: ctx.is_abr,
            net_type: config.network,
            state: InterfaceState::Down,
            address,
            prefix_len: config.address.prefix_len(),
            instance_id: config.instance_id,
            priority: config.priority,
            hello_interval: config.hello_interval,
            dead_interval: config.dead_interval,
            rxmt_interval: config.retransmit_interval,
            transmit_delay: config.transmit_delay,
            mtu: config.mtu,
            dr: Ipv4Addr::UNSPECIFIED,
            bdr: Ipv4Addr::UNSPECIFIED,
            neighbors: BTreeMap::new(),
            hello_timer: Timer::repeating(Duration::from_secs(config.hello_interval as u64)),
            wait_timer: Timer::one_shot(Duration::from_secs(config.dead_interval as u64)),
            lsdb: ctx.lsdb,
            flooding: ctx.flooding,
            network_lsa: None,
            transport,
        })
    }

    /// The address this router is known by in DR/BDR fields.
    pub fn net_id(&self) -> Ipv4Addr {
        match self.address {
            IpAddr::V4(addr) => addr,
            IpAddr::V6(_) => self.router_id,
        }
    }

    pub fn network_mask(&self) -> Ipv4Addr {
        match self.version {
            Version::V2 => prefix2mask(self.prefix_len),
            Version::V3 => Ipv4Addr::UNSPECIFIED,
        }
    }

    pub fn is_dr(&self) -> bool {
        self.dr == self.net_id()
    }

    pub fn is_bdr(&self) -> bool {
        self.bdr == self.net_id()
    }

    pub fn is_drother(&self) -> bool {
        !self.is_dr() && !self.is_bdr()
    }

    /// Whether a full adjacency should be formed with `nbr`.
    pub fn need_adjacency(&self, nbr: &Neighbor) -> bool {
        self.net_type == NetType::PointToPoint
            || self.is_dr()
            || self.is_bdr()
            || nbr.is_dr()
            || nbr.is_bdr()
    }

    pub fn options(&self) -> u32 {
        match self.version {
            Version::V2 => options::E,
            Version::V3 => options::V6 | options::E | options::R,
        }
    }

    pub fn scopes(&self) -> [LsdbScope; 3] {
        [
            LsdbScope::Link(self.interface_id),
            LsdbScope::Area(self.area_id),
            LsdbScope::As,
        ]
    }

    /// Database partition for `ls_type` as seen from this interface, `None`
    /// if the type is unknown.
    pub fn scope_of(&self, ls_type: u16) -> Option<LsdbScope> {
        Some(match flood_scope(self.version, ls_type)? {
            FloodScope::Link => LsdbScope::Link(self.interface_id),
            FloodScope::Area => LsdbScope::Area(self.area_id),
            FloodScope::As => LsdbScope::As,
        })
    }

    /// How many LSA headers fit in one Database Description packet.
    pub fn max_dd_headers(&self) -> usize {
        let overhead = match self.version {
            Version::V2 => 20 + Version::V2.header_len() + 8,
            Version::V3 => 40 + Version::V3.header_len() + 12,
        };
        ((self.mtu as usize).saturating_sub(overhead) / 20).max(1)
    }

    pub fn all_spf_routers(&self) -> IpAddr {
        match self.version {
            Version::V2 => AllSPFRouters.into(),
            Version::V3 => AllSPFRoutersV6.into(),
        }
    }

    pub fn all_d_routers(&self) -> IpAddr {
        match self.version {
            Version::V2 => AllDRouters.into(),
            Version::V3 => AllDRoutersV6.into(),
        }
    }
}
