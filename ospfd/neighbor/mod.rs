mod state;

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

pub use state::*;

use ospf_packet::lsa::{Lsa, LsaHeader, LsaIdentifier};
use ospf_packet::packet::DbDescription;

use crate::timer::Timer;

/// Anything that names one LSA instance.
pub trait Instance {
    fn header(&self) -> &LsaHeader;
}

impl Instance for LsaHeader {
    fn header(&self) -> &LsaHeader {
        self
    }
}

impl Instance for Lsa {
    fn header(&self) -> &LsaHeader {
        &self.header
    }
}

/// An ordered set of LSA instances keyed by identifier. Inserting an
/// identifier that is already present replaces the stored instance.
#[derive(Debug, Clone)]
pub struct LsaList<T>(BTreeMap<LsaIdentifier, T>);

impl<T> Default for LsaList<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T: Instance> LsaList<T> {
    pub fn insert(&mut self, item: T) {
        self.0.insert(item.header().identifier(), item);
    }

    pub fn remove(&mut self, id: &LsaIdentifier) -> Option<T> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &LsaIdentifier) -> Option<&T> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &LsaIdentifier) -> bool {
        self.0.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LsaIdentifier> {
        self.0.keys()
    }

    /// Removes and returns up to `n` entries from the front.
    pub fn take(&mut self, n: usize) -> Vec<T> {
        let keys: Vec<_> = self.0.keys().take(n).copied().collect();
        keys.iter().filter_map(|k| self.0.remove(k)).collect()
    }
}

#[derive(Debug)]
pub struct Neighbor {
    pub router_id: Ipv4Addr,
    pub ip_addr: IpAddr,
    /// OSPFv3 only.
    pub interface_id: u32,
    pub state: NeighborState,
    pub priority: u8,
    pub dr: Ipv4Addr,
    pub bdr: Ipv4Addr,
    pub options: u32,
    /// Whether this router is the master of the database exchange.
    pub master: bool,
    pub dd_seq_num: u32,
    pub last_sent_dd: Option<DbDescription>,
    pub last_recv_dd: Option<DbDescription>,
    pub db_summary_list: LsaList<LsaHeader>,
    pub ls_request_list: LsaList<LsaHeader>,
    pub ls_retransmission_list: LsaList<Lsa>,
    pub inactivity_timer: Timer,
    pub dd_rxmt: Timer,
    pub lsr_rxmt: Timer,
    pub lsu_rxmt: Timer,
}

impl Neighbor {
    pub fn new(router_id: Ipv4Addr, ip_addr: IpAddr, dead_interval: Duration, rxmt_interval: Duration) -> Self {
        Self {
            router_id,
            ip_addr,
            interface_id: 0,
            state: NeighborState::Down,
            priority: 0,
            dr: Ipv4Addr::UNSPECIFIED,
            bdr: Ipv4Addr::UNSPECIFIED,
            options: 0,
            master: false,
            dd_seq_num: 0,
            last_sent_dd: None,
            last_recv_dd: None,
            db_summary_list: Default::default(),
            ls_request_list: Default::default(),
            ls_retransmission_list: Default::default(),
            inactivity_timer: Timer::one_shot(dead_interval),
            dd_rxmt: Timer::repeating(rxmt_interval),
            lsr_rxmt: Timer::repeating(rxmt_interval),
            lsu_rxmt: Timer::repeating(rxmt_interval),
        }
    }

    /// The address the neighbor is known by in DR/BDR fields: its interface
    /// address for OSPFv2, its router ID for OSPFv3.
    pub fn net_id(&self) -> Ipv4Addr {
        match self.ip_addr {
            IpAddr::V4(addr) => addr,
            IpAddr::V6(_) => self.router_id,
        }
    }

    pub fn is_dr(&self) -> bool {
        self.dr == self.net_id()
    }

    pub fn is_bdr(&self) -> bool {
        self.bdr == self.net_id()
    }

    /// Drops everything learned during database exchange.
    pub fn reset_adjacency(&mut self) {
        self.db_summary_list.clear();
        self.ls_request_list.clear();
        self.ls_retransmission_list.clear();
        self.last_sent_dd = None;
        self.last_recv_dd = None;
        self.dd_rxmt.stop();
        self.lsr_rxmt.stop();
        self.lsu_rxmt.stop();
    }

    pub fn add_retransmission(&mut self, lsa: Lsa) {
        self.ls_retransmission_list.insert(lsa);
        if !self.lsu_rxmt.is_running() {
            self.lsu_rxmt.start();
        }
    }

    pub fn remove_retransmission(&mut self, id: &LsaIdentifier) -> Option<Lsa> {
        let removed = self.ls_retransmission_list.remove(id);
        if self.ls_retransmission_list.is_empty() {
            self.lsu_rxmt.stop();
        }
        removed
    }

    pub fn remove_request(&mut self, id: &LsaIdentifier) -> Option<LsaHeader> {
        let removed = self.ls_request_list.remove(id);
        if self.ls_request_list.is_empty() {
            self.lsr_rxmt.stop();
        }
        removed
    }
}

#[cfg(test)]
mod test {
    use ospf_packet::constant::InitialSequenceNumber;

    use super::*;

    fn header(adv: u8, seq: u32) -> LsaHeader {
        LsaHeader {
            ls_age: 0,
            options: 0,
            ls_type: 1,
            link_state_id: Ipv4Addr::new(adv, adv, adv, adv),
            advertising_router: Ipv4Addr::new(adv, adv, adv, adv),
            ls_sequence_number: seq,
            ls_checksum: 0,
            length: 20,
        }
    }

    fn neighbor() -> Neighbor {
        Neighbor::new(
            Ipv4Addr::new(2, 2, 2, 2),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            Duration::from_secs(40),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn lists_hold_one_instance_per_identifier() {
        let mut list = LsaList::default();
        list.insert(header(3, InitialSequenceNumber));
        list.insert(header(3, InitialSequenceNumber + 1));
        list.insert(header(4, InitialSequenceNumber));
        assert_eq!(list.len(), 2);
        let id = header(3, 0).identifier();
        assert_eq!(list.get(&id).unwrap().ls_sequence_number, InitialSequenceNumber + 1);
        let front = list.take(1);
        assert_eq!(front[0].identifier(), id);
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn retransmission_timer_follows_list() {
        let mut nbr = neighbor();
        let lsa = Lsa {
            header: header(3, InitialSequenceNumber),
            body: Default::default(),
        };
        let id = lsa.identifier();
        nbr.add_retransmission(lsa.clone());
        nbr.add_retransmission(lsa);
        assert_eq!(nbr.ls_retransmission_list.len(), 1);
        assert!(nbr.lsu_rxmt.is_running());
        assert!(nbr.remove_retransmission(&id).is_some());
        assert!(!nbr.lsu_rxmt.is_running());
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let mut nbr = neighbor();
        nbr.db_summary_list.insert(header(3, 1));
        nbr.ls_request_list.insert(header(4, 1));
        nbr.lsr_rxmt.start();
        nbr.dd_rxmt.start();
        nbr.reset_adjacency();
        assert!(nbr.db_summary_list.is_empty() && nbr.ls_request_list.is_empty());
        assert!(!nbr.lsr_rxmt.is_running() && !nbr.dd_rxmt.is_running());
        assert_eq!(nbr.net_id(), Ipv4Addr::new(10, 0, 0, 2));
    }
}
