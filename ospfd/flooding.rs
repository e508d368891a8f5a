use std::net::Ipv4Addr;

use ospf_packet::lsa::{Fresher, Lsa};
use ospf_packet::packet::{LsUpdate, PacketBody};
use tokio::sync::mpsc;

use crate::constant::LsaMaxAge;
use crate::database::LsdbScope;
use crate::interface::{Interface, InterfaceState};
use crate::log_warning;
use crate::neighbor::{NeighborEvent, NeighborState};

/// An LSA accepted by one interface, on its way to the siblings.
#[derive(Debug, Clone)]
pub struct Flooded {
    /// Interface that accepted or originated the LSA.
    pub interface_id: u32,
    pub area_id: Ipv4Addr,
    pub scope: LsdbScope,
    pub lsa: Lsa,
}

pub type FloodSender = mpsc::UnboundedSender<Flooded>;
pub type FloodReceiver = mpsc::UnboundedReceiver<Flooded>;

/// Copy of `lsa` as put on the wire: aged by the transmit delay, never
/// past MaxAge.
pub fn transmit_copy(lsa: &Lsa, delay: u16) -> Lsa {
    lsa.with_age(lsa.header.ls_age.saturating_add(delay).min(LsaMaxAge))
}

impl Interface {
    /// Floods `lsa` out of this interface. `from` is the neighbor it was
    /// received from when that neighbor sits on this interface.
    ///
    /// Returns whether the LSA was sent out.
    pub fn flood(&mut self, lsa: &Lsa, from: Option<Ipv4Addr>) -> bool {
        let id = lsa.identifier();
        let mut added = false;
        for nbr in self.neighbors.values_mut() {
            if nbr.state < NeighborState::Exchange {
                continue;
            }
            if nbr.state != NeighborState::Full {
                if let Some(requested) = nbr.ls_request_list.get(&id) {
                    match lsa.header.fresher(requested) {
                        Fresher::Second => continue,
                        Fresher::Both => {
                            nbr.remove_request(&id);
                            continue;
                        }
                        Fresher::First => {
                            nbr.remove_request(&id);
                        }
                    }
                }
            }
            if Some(nbr.router_id) == from {
                continue;
            }
            nbr.add_retransmission(lsa.clone());
            added = true;
        }
        if !added {
            return false;
        }
        if let Some(from) = from {
            // the DR already flooded it to everybody, or will do so
            let from_dr_or_bdr = self
                .neighbors
                .get(&from)
                .is_some_and(|n| n.is_dr() || n.is_bdr());
            if from_dr_or_bdr || self.state == InterfaceState::Backup {
                return false;
            }
        }
        let dest = match self.state {
            InterfaceState::DROther | InterfaceState::Waiting => self.all_d_routers(),
            _ => self.all_spf_routers(),
        };
        let update = LsUpdate {
            lsas: vec![transmit_copy(lsa, self.transmit_delay)],
        };
        self.send_packet(PacketBody::LsUpdate(update), dest);
        true
    }

    /// Hands an installed LSA to the router for the sibling interfaces.
    pub(crate) fn push_flood(&self, scope: LsdbScope, lsa: &Lsa) {
        if matches!(scope, LsdbScope::Link(_)) {
            return;
        }
        let flooded = Flooded {
            interface_id: self.interface_id,
            area_id: self.area_id,
            scope,
            lsa: lsa.clone(),
        };
        if self.flooding.send(flooded).is_err() {
            log_warning!("{}: flooding pipeline closed, {} not distributed", self.name, lsa.identifier());
        }
    }

    /// A sibling interface installed a new instance: older copies waiting
    /// for acknowledgment here are obsolete.
    pub(crate) fn flood_from_sibling(&mut self, lsa: Lsa) {
        let id = lsa.identifier();
        for nbr in self.neighbors.values_mut() {
            nbr.remove_retransmission(&id);
        }
        self.flood(&lsa, None);
        self.finish_loading();
    }

    /// Flooding can satisfy the last request of any neighbor on the
    /// interface, not only of the one that sent the update.
    pub(crate) fn finish_loading(&mut self) {
        let loaded: Vec<Ipv4Addr> = self
            .neighbors
            .values()
            .filter(|n| n.state == NeighborState::Loading && n.ls_request_list.is_empty())
            .map(|n| n.router_id)
            .collect();
        for id in loaded {
            self.neighbor_event(id, NeighborEvent::LoadingDone);
        }
    }
}
