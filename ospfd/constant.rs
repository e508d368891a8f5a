#![allow(non_upper_case_globals)]

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

pub use ospf_packet::constant::*;

pub const LSRefreshTime: u16 = 1800;
pub const MinLSArrival: Duration = Duration::from_secs(1);

pub const AllSPFRouters: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);
pub const AllDRouters: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 6);
pub const AllSPFRoutersV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 5);
pub const AllDRoutersV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 6);

pub const OspfProtocol: i32 = 89;

/// Upper bound on how long the interface loop waits for the next packet.
pub const PollInterval: Duration = Duration::from_millis(100);
