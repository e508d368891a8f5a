use std::net::Ipv4Addr;

use bytes::Bytes;
use ospf_packet::lsa::{types, Lsa, LsaHeader, LsaIdentifier, NetworkLsa};
use ospf_packet::{ToBytesMut, Version};

use crate::constant::{InitialSequenceNumber, LSRefreshTime, LsaMaxAge, MaxSequenceNumber};
use crate::database::LsdbScope;
use crate::interface::{Interface, InterfaceState};
use crate::neighbor::NeighborState;
use crate::util::hex2ip;
use crate::{log, log_success, log_warning};

impl Interface {
    /// Originates an LSA carrying `body`. Nothing happens when the installed
    /// instance is ours and already carries the same body.
    pub(crate) fn originate_lsa(
        &mut self,
        scope: LsdbScope,
        ls_type: u16,
        link_state_id: Ipv4Addr,
        body: Bytes,
    ) -> LsaIdentifier {
        let mut header = LsaHeader {
            ls_age: 0,
            options: match self.version {
                Version::V2 => self.options() as u8,
                Version::V3 => 0,
            },
            ls_type,
            link_state_id,
            advertising_router: self.router_id,
            ls_sequence_number: InitialSequenceNumber,
            ls_checksum: 0,
            length: 0,
        };
        let id = header.identifier();
        if let Some(old) = self.lsdb.get_entry(scope, &id) {
            let (origin, old) = (old.origin, old.lsa());
            if origin == Some(self.interface_id) && !old.header.is_max_age() && old.body == body {
                return id;
            }
            if old.header.ls_sequence_number == MaxSequenceNumber {
                // the sequence space restarts once the flushed copy is gone
                if !old.header.is_max_age() {
                    self.flush_lsa(scope, &old);
                }
                return id;
            }
            header.ls_sequence_number = old.header.ls_sequence_number.wrapping_add(1);
        }
        self.install_own(scope, Lsa::new(header, body, self.version));
        id
    }

    fn install_own(&mut self, scope: LsdbScope, lsa: Lsa) {
        let id = lsa.identifier();
        log_success!(
            "{}: originated {} seq {:#010x}",
            self.name,
            id,
            lsa.header.ls_sequence_number
        );
        for nbr in self.neighbors.values_mut() {
            nbr.remove_retransmission(&id);
        }
        self.lsdb.add_lsa(scope, lsa.clone(), Some(self.interface_id));
        self.flood(&lsa, None);
        self.push_flood(scope, &lsa);
        self.finish_loading();
    }

    /// Premature aging: reinstalls `lsa` at MaxAge and floods it.
    pub(crate) fn flush_lsa(&mut self, scope: LsdbScope, lsa: &Lsa) {
        let id = lsa.identifier();
        if lsa.header.advertising_router != self.router_id {
            log_warning!(
                "{}: flushing {} which was originated by another router",
                self.name,
                id
            );
        }
        log!("{}: flushing {}", self.name, id);
        let flushed = lsa.with_age(LsaMaxAge);
        for nbr in self.neighbors.values_mut() {
            nbr.remove_retransmission(&id);
        }
        self.lsdb.add_lsa(scope, flushed.clone(), None);
        self.flood(&flushed, None);
        self.push_flood(scope, &flushed);
        self.finish_loading();
    }

    /// Keeps the Network-LSA in line with the set of fully adjacent
    /// neighbors: originated while DR with at least one of them, flushed
    /// otherwise.
    pub(crate) fn update_network_lsa(&mut self) {
        let scope = LsdbScope::Area(self.area_id);
        let full: Vec<Ipv4Addr> = self
            .neighbors
            .values()
            .filter(|n| n.state == NeighborState::Full)
            .map(|n| n.router_id)
            .collect();
        if self.state == InterfaceState::DR && !full.is_empty() {
            let body = NetworkLsa {
                network_mask: self.network_mask(),
                options: self.options(),
                attached_routers: std::iter::once(self.router_id).chain(full).collect(),
            };
            let link_state_id = match self.version {
                Version::V2 => self.net_id(),
                Version::V3 => hex2ip(self.interface_id),
            };
            let id = self.originate_lsa(
                scope,
                types::network(self.version),
                link_state_id,
                body.to_bytes_mut(self.version).freeze(),
            );
            self.network_lsa = Some(id);
        } else if let Some(id) = self.network_lsa.take() {
            if let Some(lsa) = self.lsdb.get_lsa(scope, &id) {
                if !lsa.header.is_max_age() {
                    self.flush_lsa(scope, &lsa);
                }
            }
        }
    }

    /// Re-originates every LSA of this interface that reached
    /// LSRefreshTime.
    pub(crate) fn refresh_lsas(&mut self) {
        for (scope, lsa) in self.lsdb.self_originated(&self.scopes(), self.interface_id) {
            if lsa.header.ls_age < LSRefreshTime || lsa.header.is_max_age() {
                continue;
            }
            if lsa.header.ls_sequence_number == MaxSequenceNumber {
                self.flush_lsa(scope, &lsa);
                continue;
            }
            let mut header = lsa.header;
            header.ls_age = 0;
            header.ls_sequence_number = header.ls_sequence_number.wrapping_add(1);
            self.install_own(scope, Lsa::new(header, lsa.body.clone(), self.version));
        }
    }

    /// Whether `header` describes an LSA this router is responsible for.
    pub(crate) fn is_self_originated(&self, header: &LsaHeader) -> bool {
        header.advertising_router == self.router_id
            || (self.version == Version::V2
                && header.ls_type == types::NetworkLSA
                && header.link_state_id == self.net_id())
    }

    /// A neighbor sent a newer instance of one of our LSAs: either move past
    /// it or get rid of it.
    pub(crate) fn self_originated_received(&mut self, scope: LsdbScope, lsa: &Lsa) {
        let id = lsa.identifier();
        if self.network_lsa == Some(id) && self.state == InterfaceState::DR {
            log!("{}: received newer instance of own {}", self.name, id);
            self.update_network_lsa();
        } else if !lsa.header.is_max_age() {
            self.flush_lsa(scope, lsa);
        }
    }
}
