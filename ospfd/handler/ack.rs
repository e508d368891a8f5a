use std::net::Ipv4Addr;

use ospf_packet::lsa::Fresher;
use ospf_packet::packet::LsAcknowledge;

use crate::interface::Interface;
use crate::neighbor::NeighborState;
use crate::{guard, log_warning, must};

impl Interface {
    pub(crate) fn handle_ack(&mut self, router_id: Ipv4Addr, ack: LsAcknowledge) {
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id);
            debug: "{}: ack from unknown neighbor {}", self.name, router_id);
        must!(nbr.state >= NeighborState::Exchange;
            debug: "{}: ack from {} ignored in {:?}", self.name, router_id, nbr.state);
        for header in &ack.lsa_headers {
            let id = header.identifier();
            let Some(pending) = nbr.ls_retransmission_list.get(&id) else {
                continue;
            };
            if header.fresher(&pending.header) == Fresher::Both {
                nbr.remove_retransmission(&id);
            } else {
                log_warning!("{}: stale ack for {} from {}", self.name, id, router_id);
            }
        }
    }
}
