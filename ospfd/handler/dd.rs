use std::net::Ipv4Addr;

use ospf_packet::lsa::{Fresher, LsaHeader};
use ospf_packet::packet::{DbDescription, DdFlags, PacketBody};

use crate::interface::Interface;
use crate::neighbor::{NeighborEvent, NeighborState};
use crate::{guard, log, log_warning, must};

impl Interface {
    pub(crate) fn handle_dd(&mut self, router_id: Ipv4Addr, dd: DbDescription) {
        guard!(Some(nbr) = self.neighbors.get(&router_id);
            debug: "{}: DD from unknown neighbor {}", self.name, router_id);
        must!(dd.interface_mtu <= self.mtu;
            warning: "{}: DD from {} with MTU {} above ours", self.name, router_id, dd.interface_mtu);
        if nbr.state == NeighborState::Init {
            self.neighbor_event(router_id, NeighborEvent::TwoWayReceived);
        }

        guard!(Some(nbr) = self.neighbors.get(&router_id));
        let duplicate = nbr.last_recv_dd.as_ref().is_some_and(|last| last.same_as(&dd));
        match nbr.state {
            NeighborState::ExStart => self.negotiate(router_id, dd),
            NeighborState::Exchange | NeighborState::Loading | NeighborState::Full if duplicate => {
                self.duplicate_dd(router_id)
            }
            NeighborState::Exchange => {
                let expected = if nbr.master {
                    nbr.dd_seq_num
                } else {
                    nbr.dd_seq_num.wrapping_add(1)
                };
                let mismatch = dd.is_master() == nbr.master
                    || dd.is_init()
                    || nbr.last_recv_dd.as_ref().is_some_and(|last| last.options != dd.options)
                    || dd.dd_sequence_number != expected;
                if mismatch {
                    log!("{}: unexpected DD from {} in Exchange", self.name, router_id);
                    self.neighbor_event(router_id, NeighborEvent::SeqNumberMismatch);
                } else {
                    self.exchange(router_id, dd);
                }
            }
            NeighborState::Loading | NeighborState::Full => {
                self.neighbor_event(router_id, NeighborEvent::SeqNumberMismatch)
            }
            state => log!("{}: DD from {} ignored in {:?}", self.name, router_id, state),
        }
    }

    /// Master/slave negotiation in ExStart. The larger router ID is master.
    fn negotiate(&mut self, router_id: Ipv4Addr, dd: DbDescription) {
        let my_id = self.router_id;
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        if dd.is_init()
            && dd.is_more()
            && dd.is_master()
            && dd.lsa_headers.is_empty()
            && router_id > my_id
        {
            nbr.master = false;
            nbr.dd_seq_num = dd.dd_sequence_number;
        } else if !dd.is_init()
            && !dd.is_master()
            && dd.dd_sequence_number == nbr.dd_seq_num
            && router_id < my_id
        {
            nbr.master = true;
        } else {
            log!("{}: negotiation DD from {} ignored", self.name, router_id);
            return;
        }
        nbr.options = dd.options;
        self.neighbor_event(router_id, NeighborEvent::NegotiationDone);
        self.exchange(router_id, dd);
    }

    /// The slave answers a duplicate with its last packet, the master drops it.
    fn duplicate_dd(&mut self, router_id: Ipv4Addr) {
        guard!(Some(nbr) = self.neighbors.get(&router_id));
        if nbr.master {
            log!("{}: duplicate DD from {} discarded", self.name, router_id);
            return;
        }
        guard!(Some(last) = nbr.last_sent_dd.clone());
        let dest = nbr.ip_addr;
        self.send_packet(PacketBody::DbDescription(last), dest);
    }

    /// Accepts the headers of an in-sequence DD and sends the next one.
    fn exchange(&mut self, router_id: Ipv4Addr, dd: DbDescription) {
        let mut wanted: Vec<LsaHeader> = Vec::new();
        for header in &dd.lsa_headers {
            let Some(scope) = self.scope_of(header.ls_type) else {
                log_warning!(
                    "{}: DD from {} describes unknown LSA type {:#x}",
                    self.name,
                    router_id,
                    header.ls_type
                );
                self.neighbor_event(router_id, NeighborEvent::SeqNumberMismatch);
                return;
            };
            let newer = match self.lsdb.get_lsa(scope, &header.identifier()) {
                Some(local) => header.fresher(&local.header) == Fresher::First,
                None => true,
            };
            if newer {
                wanted.push(*header);
            }
        }

        let (mtu, options, max_headers) = (self.mtu, self.options(), self.max_dd_headers());
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        for header in wanted {
            nbr.ls_request_list.insert(header);
        }
        let their_more = dd.is_more();
        let their_seq = dd.dd_sequence_number;
        nbr.last_recv_dd = Some(dd);

        let our_more = nbr.last_sent_dd.as_ref().is_some_and(|last| last.is_more());
        if nbr.master {
            nbr.dd_seq_num = nbr.dd_seq_num.wrapping_add(1);
            if !our_more && !their_more {
                self.neighbor_event(router_id, NeighborEvent::ExchangeDone);
                return;
            }
        } else {
            nbr.dd_seq_num = their_seq;
        }

        let lsa_headers = nbr.db_summary_list.take(max_headers);
        let mut flags = DdFlags::empty();
        if !nbr.db_summary_list.is_empty() {
            flags |= DdFlags::M;
        }
        if nbr.master {
            flags |= DdFlags::MS;
            nbr.dd_rxmt.start();
        }
        let reply = DbDescription {
            interface_mtu: mtu,
            options,
            flags,
            dd_sequence_number: nbr.dd_seq_num,
            lsa_headers,
        };
        let done = !nbr.master && !reply.is_more() && !their_more;
        nbr.last_sent_dd = Some(reply.clone());
        let dest = nbr.ip_addr;
        self.send_packet(PacketBody::DbDescription(reply), dest);
        if done {
            self.neighbor_event(router_id, NeighborEvent::ExchangeDone);
        }
    }
}
