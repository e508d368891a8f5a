use std::net::Ipv4Addr;

use ospf_packet::packet::{LsRequest, LsUpdate, PacketBody};

use crate::flooding::transmit_copy;
use crate::interface::Interface;
use crate::neighbor::{NeighborEvent, NeighborState};
use crate::{guard, log_warning, must};

impl Interface {
    /// Answers with every requested LSA in one update, or with nothing at all
    /// when one of them is missing.
    pub(crate) fn handle_lsr(&mut self, router_id: Ipv4Addr, lsr: LsRequest) {
        guard!(Some(nbr) = self.neighbors.get(&router_id);
            debug: "{}: LSR from unknown neighbor {}", self.name, router_id);
        must!(nbr.state >= NeighborState::Exchange;
            debug: "{}: LSR from {} ignored in {:?}", self.name, router_id, nbr.state);
        let dest = nbr.ip_addr;

        let mut lsas = Vec::with_capacity(lsr.requests.len());
        for id in &lsr.requests {
            let found = self
                .scope_of(id.ls_type)
                .and_then(|scope| self.lsdb.get_lsa(scope, id));
            let Some(lsa) = found else {
                log_warning!("{}: {} requested unknown LSA {}", self.name, router_id, id);
                self.neighbor_event(router_id, NeighborEvent::BadLSReq);
                return;
            };
            lsas.push(transmit_copy(&lsa, self.transmit_delay));
        }
        if !lsas.is_empty() {
            self.send_packet(PacketBody::LsUpdate(LsUpdate { lsas }), dest);
        }
    }
}
