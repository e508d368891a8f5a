use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use ospf_packet::packet::{options, Hello};
use ospf_packet::Version;

use crate::config::NetType;
use crate::interface::{Interface, InterfaceEvent, InterfaceState};
use crate::neighbor::{Neighbor, NeighborEvent};
use crate::{guard, log_success, must};

impl Interface {
    pub(crate) fn handle_hello(&mut self, router_id: Ipv4Addr, source: IpAddr, hello: Hello) {
        must!(self.version == Version::V3
            || self.net_type == NetType::PointToPoint
            || hello.network_mask == self.network_mask();
            debug: "{}: hello from {} with mask {}", self.name, router_id, hello.network_mask);
        must!(hello.hello_interval == self.hello_interval;
            debug: "{}: hello from {} with interval {}", self.name, router_id, hello.hello_interval);
        must!(hello.router_dead_interval == self.dead_interval;
            debug: "{}: hello from {} with dead interval {}", self.name, router_id, hello.router_dead_interval);
        must!(hello.options & options::E == self.options() & options::E;
            debug: "{}: hello from {} with mismatched E-bit", self.name, router_id);

        let is_new = !self.neighbors.contains_key(&router_id);
        if is_new {
            let nbr = Neighbor::new(
                router_id,
                source,
                Duration::from_secs(self.dead_interval as u64),
                Duration::from_secs(self.rxmt_interval as u64),
            );
            self.neighbors.insert(router_id, nbr);
            log_success!("{}: new neighbor {} at {}", self.name, router_id, source);
        }
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        let old = (nbr.priority, nbr.is_dr(), nbr.is_bdr());
        nbr.ip_addr = source;
        nbr.interface_id = hello.interface_id;
        nbr.priority = hello.router_priority;
        nbr.dr = hello.designated_router;
        nbr.bdr = hello.backup_designated_router;
        nbr.options = hello.options;
        let new = (nbr.priority, nbr.is_dr(), nbr.is_bdr());

        self.neighbor_event(router_id, NeighborEvent::HelloReceived);
        if !hello.neighbors.contains(&self.router_id) {
            self.neighbor_event(router_id, NeighborEvent::OneWayReceived);
            return;
        }
        self.neighbor_event(router_id, NeighborEvent::TwoWayReceived);

        let (_, declares_dr, declares_bdr) = new;
        if self.state == InterfaceState::Waiting
            && (declares_bdr || (declares_dr && hello.backup_designated_router.is_unspecified()))
        {
            self.interface_event(InterfaceEvent::BackupSeen);
        } else if !is_new && old != new {
            self.interface_event(InterfaceEvent::NeighborChange);
        }
    }
}
