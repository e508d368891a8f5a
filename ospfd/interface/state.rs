use std::net::Ipv4Addr;

use ospf_packet::lsa::Lsa;
use ospf_packet::packet::{DbDescription, DdFlags, Hello, LsRequest, PacketBody};

use super::Interface;
use crate::config::NetType;
use crate::neighbor::{Conditions, NeighborEvent, NeighborState};
use crate::{guard, log, log_success};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceState {
    Down,
    Waiting,
    PointToPoint,
    DROther,
    Backup,
    DR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceEvent {
    InterfaceUp,
    WaitTimer,
    BackupSeen,
    NeighborChange,
    InterfaceDown,
}

impl Interface {
    pub fn interface_event(&mut self, event: InterfaceEvent) {
        use InterfaceEvent::*;
        use InterfaceState::*;

        log!("interface {}({:?}) recv event: {:?}", self.name, self.state, event);
        let old = self.state;
        match (event, old) {
            (InterfaceUp, Down) => {
                self.hello_timer.start();
                self.state = if self.net_type == NetType::PointToPoint {
                    PointToPoint
                } else if self.priority == 0 {
                    DROther
                } else {
                    self.wait_timer.start();
                    Waiting
                };
                log_success!(
                    "interface {} up: {} area {}{}",
                    self.name,
                    self.address,
                    self.area_id,
                    if self.is_abr { " (abr)" } else { "" }
                );
            }
            (WaitTimer | BackupSeen, Waiting) => {
                self.wait_timer.stop();
                self.run_election();
            }
            (NeighborChange, DROther | Backup | DR) => self.run_election(),
            (InterfaceDown, _) => self.interface_down(),
            _ => return,
        }
        if old != self.state {
            log_success!(
                "interface {}'s state changed: {:?} -> {:?}",
                self.name,
                old,
                self.state
            );
        }
    }

    fn interface_down(&mut self) {
        self.hello_timer.stop();
        self.wait_timer.stop();
        self.state = InterfaceState::Down;
        let ids: Vec<Ipv4Addr> = self.neighbors.keys().copied().collect();
        for id in ids {
            self.neighbor_event(id, NeighborEvent::KillNbr);
        }
        self.dr = Ipv4Addr::UNSPECIFIED;
        self.bdr = Ipv4Addr::UNSPECIFIED;
        self.update_network_lsa();
    }

    pub fn neighbor_event(&mut self, router_id: Ipv4Addr, event: NeighborEvent) {
        use NeighborEvent::*;
        use NeighborState::*;

        guard!(Some(nbr) = self.neighbors.get(&router_id));
        let cond = Conditions {
            adjacency_ok: self.need_adjacency(nbr),
            request_list_empty: nbr.ls_request_list.is_empty(),
        };
        let old = nbr.state;
        log!("neighbor {}({:?}) recv event: {:?}", router_id, old, event);
        guard!(Some(new) = old.next(event, cond); debug: "neighbor {}: {:?} ignored in {:?}", router_id, event, old);

        let catalogue = if event == NegotiationDone {
            self.database_catalogue()
        } else {
            vec![]
        };
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        match event {
            HelloReceived => nbr.inactivity_timer.start(),
            NegotiationDone => {
                for lsa in catalogue {
                    if lsa.header.is_max_age() {
                        nbr.add_retransmission(lsa);
                    } else {
                        nbr.db_summary_list.insert(lsa.header);
                    }
                }
            }
            ExchangeDone => nbr.dd_rxmt.stop(),
            LoadingDone => nbr.lsr_rxmt.stop(),
            BadLSReq | SeqNumberMismatch => nbr.reset_adjacency(),
            OneWayReceived | AdjOk if new < old => nbr.reset_adjacency(),
            KillNbr | InactivityTimer | LLDown => {
                nbr.reset_adjacency();
                nbr.inactivity_timer.stop();
            }
            _ => {}
        }
        nbr.state = new;
        if old != new {
            log_success!(
                "neighbor {}({})'s state changed: {:?} -> {:?}",
                router_id,
                if nbr.master { "slave" } else { "master" },
                old,
                new
            );
        }

        if new == ExStart && (old != ExStart || matches!(event, BadLSReq | SeqNumberMismatch)) {
            self.start_exchange(router_id);
        }
        if event == ExchangeDone && new == Loading {
            self.send_ls_request(router_id);
        }
        if new == Down {
            self.neighbors.remove(&router_id);
            log_success!("neighbor {} removed from {}", router_id, self.name);
        }
        if (old >= TwoWay) != (new >= TwoWay) {
            self.interface_event(InterfaceEvent::NeighborChange);
        }
        if (old == Full) != (new == Full) {
            self.update_network_lsa();
        }
    }

    /// Every LSA this interface can describe to a neighbor.
    fn database_catalogue(&self) -> Vec<Lsa> {
        self.scopes()
            .into_iter()
            .flat_map(|scope| {
                self.lsdb
                    .get_lsa_headers(scope, None)
                    .into_iter()
                    .filter_map(move |h| self.lsdb.get_lsa(scope, &h.identifier()))
            })
            .collect()
    }

    /// Enters negotiation as master with an empty I/M/MS packet.
    pub(crate) fn start_exchange(&mut self, router_id: Ipv4Addr) {
        let (mtu, options) = (self.mtu, self.options());
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        nbr.dd_seq_num = if nbr.dd_seq_num == 0 {
            rand::random::<u32>().max(1)
        } else {
            nbr.dd_seq_num.wrapping_add(1)
        };
        nbr.master = true;
        let dd = DbDescription {
            interface_mtu: mtu,
            options,
            flags: DdFlags::I | DdFlags::M | DdFlags::MS,
            dd_sequence_number: nbr.dd_seq_num,
            lsa_headers: vec![],
        };
        nbr.last_sent_dd = Some(dd.clone());
        nbr.last_recv_dd = None;
        nbr.dd_rxmt.start();
        let dest = nbr.ip_addr;
        self.send_packet(PacketBody::DbDescription(dd), dest);
    }

    /// Requests everything still on the neighbor's request list.
    pub(crate) fn send_ls_request(&mut self, router_id: Ipv4Addr) {
        guard!(Some(nbr) = self.neighbors.get_mut(&router_id));
        if nbr.ls_request_list.is_empty() {
            nbr.lsr_rxmt.stop();
            return;
        }
        let requests = nbr.ls_request_list.values().map(|h| h.identifier()).collect();
        if !nbr.lsr_rxmt.is_running() {
            nbr.lsr_rxmt.start();
        }
        let dest = nbr.ip_addr;
        self.send_packet(PacketBody::LsRequest(LsRequest { requests }), dest);
    }

    pub(crate) fn send_hello(&mut self) {
        let hello = Hello {
            network_mask: self.network_mask(),
            interface_id: self.interface_id,
            hello_interval: self.hello_interval,
            options: self.options(),
            router_priority: self.priority,
            router_dead_interval: self.dead_interval,
            designated_router: self.dr,
            backup_designated_router: self.bdr,
            neighbors: self
                .neighbors
                .values()
                .filter(|n| n.state >= NeighborState::Init)
                .map(|n| n.router_id)
                .collect(),
        };
        let dest = self.all_spf_routers();
        self.send_packet(PacketBody::Hello(hello), dest);
    }
}
