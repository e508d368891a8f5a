use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;
use ospf_packet::lsa::{Lsa, LsaIdentifier};
use ospf_packet::packet::{LsUpdate, PacketBody};
use tokio::sync::{mpsc, watch};

use super::{Interface, InterfaceEvent};
use crate::constant::PollInterval;
use crate::database::Activity;
use crate::flooding::transmit_copy;
use crate::log;
use crate::neighbor::{NeighborEvent, NeighborState};

/// A raw packet as read off the link.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub data: Bytes,
    pub source: IpAddr,
    /// Unspecified when the transport cannot tell.
    pub destination: IpAddr,
}

#[derive(Debug, Clone)]
pub enum Input {
    Packet(Incoming),
    /// An LSA installed by a sibling interface that must be flooded here.
    Flood(Lsa),
}

/// Runs one interface until `shutdown` flips or the inbound queue closes.
/// The interface is brought down before this returns.
pub async fn listen_interface(
    mut iface: Interface,
    mut inbound: mpsc::Receiver<Input>,
    mut shutdown: watch::Receiver<bool>,
) -> Interface {
    iface.interface_event(InterfaceEvent::InterfaceUp);
    loop {
        if *shutdown.borrow() {
            break;
        }
        let input = tokio::select! {
            _ = shutdown.changed() => break,
            input = tokio::time::timeout(PollInterval, inbound.recv()) => match input {
                Ok(Some(input)) => Some(input),
                Ok(None) => break,
                Err(_) => None,
            },
        };
        iface.poll(input);
    }
    iface.interface_event(InterfaceEvent::InterfaceDown);
    iface.publish_activity();
    log!("interface {} stopped", iface.name);
    iface
}

impl Interface {
    /// One pass of the interface loop.
    pub fn poll(&mut self, input: Option<Input>) {
        self.expire_neighbors();
        if self.wait_timer.take_fired() {
            self.interface_event(InterfaceEvent::WaitTimer);
        }
        self.retransmit();
        match input {
            Some(Input::Packet(incoming)) => self.handle_packet(incoming),
            Some(Input::Flood(lsa)) => self.flood_from_sibling(lsa),
            None => {}
        }
        self.flush_max_age();
        self.refresh_lsas();
        if self.hello_timer.take_fired() {
            self.send_hello();
        }
        self.publish_activity();
    }

    /// Tells the sibling interfaces what our neighbors still need kept.
    pub(crate) fn publish_activity(&self) {
        let activity = Activity {
            exchanging: self
                .neighbors
                .values()
                .any(|n| matches!(n.state, NeighborState::Exchange | NeighborState::Loading)),
            retransmitting: self
                .neighbors
                .values()
                .flat_map(|n| n.ls_retransmission_list.keys().copied())
                .collect(),
        };
        self.lsdb.set_activity(self.interface_id, activity);
    }

    /// Whether any neighbor of the router is in Exchange or Loading.
    pub(crate) fn exchanging(&self) -> bool {
        self.neighbors
            .values()
            .any(|n| matches!(n.state, NeighborState::Exchange | NeighborState::Loading))
            || self.lsdb.exchanging_elsewhere(self.interface_id)
    }

    /// Whether any neighbor of the router still waits for an ack of `id`.
    fn retransmitting(&self, id: &LsaIdentifier) -> bool {
        self.neighbors
            .values()
            .any(|n| n.ls_retransmission_list.contains(id))
            || self.lsdb.retransmitting_elsewhere(self.interface_id, id)
    }

    fn expire_neighbors(&mut self) {
        let expired: Vec<Ipv4Addr> = self
            .neighbors
            .iter_mut()
            .filter_map(|(id, nbr)| nbr.inactivity_timer.take_fired().then_some(*id))
            .collect();
        for id in expired {
            self.neighbor_event(id, NeighborEvent::InactivityTimer);
        }
    }

    fn retransmit(&mut self) {
        let ids: Vec<Ipv4Addr> = self.neighbors.keys().copied().collect();
        let delay = self.transmit_delay;
        for id in ids {
            let Some(nbr) = self.neighbors.get_mut(&id) else {
                continue;
            };
            let dest = nbr.ip_addr;

            let mut dd = None;
            if nbr.dd_rxmt.take_fired() {
                let negotiating = nbr.state == NeighborState::ExStart
                    || (nbr.master && nbr.state == NeighborState::Exchange);
                match &nbr.last_sent_dd {
                    Some(last) if negotiating => dd = Some(last.clone()),
                    _ => nbr.dd_rxmt.stop(),
                }
            }
            let lsr = nbr.lsr_rxmt.take_fired();
            let mut lsu = None;
            if nbr.lsu_rxmt.take_fired() {
                if nbr.ls_retransmission_list.is_empty() {
                    nbr.lsu_rxmt.stop();
                } else {
                    lsu = Some(LsUpdate {
                        lsas: nbr
                            .ls_retransmission_list
                            .values()
                            .map(|lsa| transmit_copy(lsa, delay))
                            .collect(),
                    });
                }
            }

            if let Some(dd) = dd {
                log!("{}: retransmitting DD to {}", self.name, id);
                self.send_packet(PacketBody::DbDescription(dd), dest);
            }
            if lsr {
                self.send_ls_request(id);
            }
            if let Some(lsu) = lsu {
                log!("{}: retransmitting {} LSAs to {}", self.name, lsu.lsas.len(), id);
                self.send_packet(PacketBody::LsUpdate(lsu), dest);
            }
        }
    }

    /// Drops MaxAge LSAs nobody is waiting on anymore.
    fn flush_max_age(&mut self) {
        if self.exchanging() {
            return;
        }
        for (scope, lsa) in self.lsdb.max_age_lsas(&self.scopes()) {
            let id = lsa.identifier();
            if self.retransmitting(&id) {
                continue;
            }
            self.lsdb.delete_lsa(scope, &id);
            log!("{}: removed MaxAge LSA {}", self.name, id);
            if self.network_lsa == Some(id) {
                // flushed to restart the sequence space
                self.network_lsa = None;
                self.update_network_lsa();
            }
        }
    }
}
