use std::net::Ipv4Addr;

use ospf_packet::lsa::{Fresher, Lsa, LsaHeader};
use ospf_packet::packet::{LsAcknowledge, LsUpdate, PacketBody};

use crate::constant::{MaxSequenceNumber, MinLSArrival};
use crate::flooding::transmit_copy;
use crate::interface::Interface;
use crate::neighbor::{NeighborEvent, NeighborState};
use crate::{guard, log, must};

/// What became of one received LSA.
enum Received {
    Done,
    /// Acknowledge it back to the sender.
    Ack(LsaHeader),
    /// A requested instance turned out older than ours; stop processing.
    BadRequest,
}

impl Interface {
    pub(crate) fn handle_lsu(&mut self, router_id: Ipv4Addr, lsu: LsUpdate) {
        guard!(Some(nbr) = self.neighbors.get(&router_id);
            debug: "{}: LSU from unknown neighbor {}", self.name, router_id);
        must!(nbr.state >= NeighborState::Exchange;
            debug: "{}: LSU from {} ignored in {:?}", self.name, router_id, nbr.state);

        let mut acks = Vec::new();
        for lsa in lsu.lsas {
            match self.receive_lsa(router_id, lsa) {
                Received::Done => {}
                Received::Ack(header) => acks.push(header),
                Received::BadRequest => {
                    self.neighbor_event(router_id, NeighborEvent::BadLSReq);
                    self.finish_loading();
                    return;
                }
            }
        }

        guard!(Some(nbr) = self.neighbors.get(&router_id));
        let dest = nbr.ip_addr;
        if !acks.is_empty() {
            let ack = LsAcknowledge { lsa_headers: acks };
            self.send_packet(PacketBody::LsAcknowledge(ack), dest);
        }
        self.finish_loading();
    }

    fn receive_lsa(&mut self, router_id: Ipv4Addr, lsa: Lsa) -> Received {
        let id = lsa.identifier();
        if !lsa.checksum_valid(self.version) {
            log!("{}: {} from {} has a bad checksum", self.name, id, router_id);
            return Received::Done;
        }
        let Some(scope) = self.scope_of(lsa.header.ls_type) else {
            log!("{}: {} from {} has an unknown type", self.name, id, router_id);
            return Received::Done;
        };
        let local = self.lsdb.get_entry(scope, &id);

        if lsa.header.is_max_age() && local.is_none() && !self.exchanging() {
            return Received::Ack(lsa.header);
        }

        let fresher = match &local {
            Some(entry) => lsa.header.fresher(&entry.header()),
            None => Fresher::First,
        };
        if fresher == Fresher::First {
            if let Some(entry) = &local {
                if entry.installed.elapsed() < MinLSArrival {
                    log!("{}: {} arrived within MinLSArrival", self.name, id);
                    return Received::Done;
                }
            }
            let ours = self.is_self_originated(&lsa.header)
                && local
                    .as_ref()
                    .and_then(|entry| entry.origin)
                    .map_or(true, |origin| origin == self.interface_id);
            for nbr in self.neighbors.values_mut() {
                nbr.remove_retransmission(&id);
            }
            let flooded = self.flood(&lsa, Some(router_id));
            self.lsdb.add_lsa(scope, lsa.clone(), None);
            self.push_flood(scope, &lsa);
            log!(
                "{}: installed {} seq {:#010x} from {}",
                self.name,
                id,
                lsa.header.ls_sequence_number,
                router_id
            );
            if ours {
                self.self_originated_received(scope, &lsa);
            }
            return if flooded {
                Received::Done
            } else {
                Received::Ack(lsa.header)
            };
        }

        guard!(Some(nbr) = self.neighbors.get_mut(&router_id); ret: Received::Done);
        if nbr.ls_request_list.contains(&id) {
            return Received::BadRequest;
        }
        guard!(Some(entry) = local; ret: Received::Done);
        if fresher == Fresher::Both {
            // implied acknowledgment when it was waiting for one
            if nbr.remove_retransmission(&id).is_some() {
                return Received::Done;
            }
            return Received::Ack(lsa.header);
        }

        let current = entry.lsa();
        if current.header.is_max_age() && current.header.ls_sequence_number == MaxSequenceNumber {
            return Received::Done;
        }
        if entry.installed.elapsed() < MinLSArrival {
            return Received::Done;
        }
        let dest = nbr.ip_addr;
        log!("{}: sending newer {} back to {}", self.name, id, router_id);
        let update = LsUpdate {
            lsas: vec![transmit_copy(&current, self.transmit_delay)],
        };
        self.send_packet(PacketBody::LsUpdate(update), dest);
        Received::Done
    }
}
