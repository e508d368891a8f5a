use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use ospf_packet::constant::InitialSequenceNumber;
use ospf_packet::lsa::{types, Lsa, LsaHeader};
use ospf_packet::packet::{
    options, DbDescription, DdFlags, Hello, LsAcknowledge, LsRequest, LsUpdate,
};
use ospf_packet::{FromBuf, Packet, PacketBody, Version};
use tokio::sync::mpsc;

use super::*;
use crate::constant::LsaMaxAge;
use crate::flooding::FloodReceiver;
use crate::neighbor::NeighborState;
use crate::sender::MemoryTransport;

const AREA: Ipv4Addr = Ipv4Addr::UNSPECIFIED;
const ME: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);
const ME_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const NBR: Ipv4Addr = Ipv4Addr::new(2, 2, 2, 2);
const NBR_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
const OTHER: Ipv4Addr = Ipv4Addr::new(3, 3, 3, 3);
const PEER: Ipv4Addr = Ipv4Addr::new(4, 4, 4, 4);
const PEER_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 4);

struct Harness {
    iface: Interface,
    wire: MemoryTransport,
    _flooded: FloodReceiver,
}

fn harness(router_id: Ipv4Addr, address: Ipv4Addr, priority: u8) -> Harness {
    harness_on(router_id, address, priority, 1, Arc::new(Lsdb::new()))
}

/// An interface with its own ID on a database that may be shared with
/// sibling interfaces.
fn harness_on(
    router_id: Ipv4Addr,
    address: Ipv4Addr,
    priority: u8,
    interface_id: u32,
    lsdb: Arc<Lsdb>,
) -> Harness {
    let config = InterfaceConfig {
        name: format!("eth-{}", router_id),
        address: format!("{}/24", address).parse().unwrap(),
        priority,
        ..Default::default()
    };
    let (flooding, flooded) = mpsc::unbounded_channel();
    let ctx = InterfaceContext {
        router_id,
        interface_id,
        is_abr: false,
        lsdb,
        flooding,
    };
    let wire = MemoryTransport::default();
    let iface = Interface::new(&config, ctx, Box::new(wire.clone())).unwrap();
    Harness {
        iface,
        wire,
        _flooded: flooded,
    }
}

fn router_lsa(adv: Ipv4Addr, seq: u32) -> Lsa {
    let header = LsaHeader {
        ls_age: 1,
        options: options::E as u8,
        ls_type: types::RouterLSA,
        link_state_id: adv,
        advertising_router: adv,
        ls_sequence_number: seq,
        ls_checksum: 0,
        length: 0,
    };
    Lsa::new(header, Bytes::from_static(&[0, 0, 0, 0]), Version::V2)
}

fn hello(priority: u8, dr: Ipv4Addr, bdr: Ipv4Addr, neighbors: Vec<Ipv4Addr>) -> PacketBody {
    PacketBody::Hello(Hello {
        network_mask: Ipv4Addr::new(255, 255, 255, 0),
        interface_id: 0,
        hello_interval: 10,
        options: options::E,
        router_priority: priority,
        router_dead_interval: 40,
        designated_router: dr,
        backup_designated_router: bdr,
        neighbors,
    })
}

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

impl Harness {
    fn receive(&mut self, body: PacketBody) {
        let packet = Packet {
            version: Version::V2,
            router_id: NBR,
            area_id: AREA,
            instance_id: 0,
            body,
        };
        self.iface.poll(Some(Input::Packet(Incoming {
            data: packet.encode().freeze(),
            source: NBR_IP.into(),
            destination: crate::constant::AllSPFRouters.into(),
        })));
    }

    fn add_neighbor(&mut self, state: NeighborState) -> &mut Neighbor {
        let mut nbr = Neighbor::new(
            NBR,
            NBR_IP.into(),
            Duration::from_secs(40),
            Duration::from_secs(5),
        );
        nbr.state = state;
        nbr.priority = 1;
        nbr.options = options::E;
        self.iface.neighbors.insert(NBR, nbr);
        self.iface.neighbors.get_mut(&NBR).unwrap()
    }

    fn neighbor(&self) -> &Neighbor {
        &self.iface.neighbors[&NBR]
    }

    fn sent(&self) -> Vec<(PacketBody, IpAddr)> {
        self.wire
            .take()
            .into_iter()
            .map(|(packet, dest)| (packet.body, dest))
            .collect()
    }
}

#[tokio::test]
async fn test_new_neighbor_starts_in_init() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    assert_eq!(h.iface.state, InterfaceState::Waiting);

    h.receive(hello(1, AREA, AREA, vec![]));
    assert_eq!(h.neighbor().state, NeighborState::Init);
    assert_eq!(h.neighbor().priority, 1);
    assert!(h.neighbor().inactivity_timer.is_running());
}

#[tokio::test]
async fn test_two_way_then_exstart() {
    let mut h = harness(ME, ME_IP, 5);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.receive(hello(1, AREA, AREA, vec![]));
    h.receive(hello(1, AREA, AREA, vec![ME]));
    assert_eq!(h.neighbor().state, NeighborState::TwoWay);
    assert!(h.sent().is_empty());

    h.iface.wait_timer.fire();
    h.iface.poll(None);
    assert_eq!(h.iface.state, InterfaceState::DR);
    assert_eq!((h.iface.dr, h.iface.bdr), (ME_IP, NBR_IP));
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
    assert!(h.neighbor().master);

    let sent = h.sent();
    let (PacketBody::DbDescription(dd), dest) = &sent[0] else {
        panic!("expected a DD packet, got {:?}", sent);
    };
    assert_eq!(*dest, IpAddr::from(NBR_IP));
    assert_eq!(dd.flags, DdFlags::I | DdFlags::M | DdFlags::MS);
    assert!(dd.lsa_headers.is_empty());
    assert_ne!(dd.dd_sequence_number, 0);
    assert_eq!(dd.dd_sequence_number, h.neighbor().dd_seq_num);
}

#[tokio::test]
async fn test_backup_seen_ends_waiting() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.receive(hello(1, NBR_IP, AREA, vec![]));
    assert_eq!(h.iface.state, InterfaceState::Waiting);

    h.receive(hello(1, NBR_IP, AREA, vec![ME]));
    assert!(!h.iface.wait_timer.is_running());
    assert_eq!(h.iface.state, InterfaceState::Backup);
    assert_eq!((h.iface.dr, h.iface.bdr), (NBR_IP, ME_IP));
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
}

#[tokio::test]
async fn test_full_load() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    let old = router_lsa(OTHER, InitialSequenceNumber);
    let nbr = h.add_neighbor(NeighborState::Loading);
    nbr.ls_request_list.insert(old.header);
    nbr.lsr_rxmt.start();

    let newer = router_lsa(OTHER, InitialSequenceNumber + 1);
    h.receive(PacketBody::LsUpdate(LsUpdate {
        lsas: vec![newer.clone()],
    }));

    let installed = h
        .iface
        .lsdb
        .get_lsa(LsdbScope::Area(AREA), &newer.identifier())
        .unwrap();
    assert_eq!(installed.header.ls_sequence_number, InitialSequenceNumber + 1);
    assert!(h.neighbor().ls_request_list.is_empty());
    assert!(!h.neighbor().lsr_rxmt.is_running());
    assert_eq!(h.neighbor().state, NeighborState::Full);

    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    let (PacketBody::LsAcknowledge(ack), dest) = &sent[0] else {
        panic!("expected an ack, got {:?}", sent);
    };
    assert_eq!(*dest, IpAddr::from(NBR_IP));
    assert_eq!(ack.lsa_headers[0].identifier(), newer.identifier());
}

#[tokio::test]
async fn test_flood_completes_loading_of_every_neighbor() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    let old = router_lsa(OTHER, InitialSequenceNumber);
    let nbr = h.add_neighbor(NeighborState::Loading);
    nbr.ls_request_list.insert(old.header);
    nbr.lsr_rxmt.start();
    let mut peer = Neighbor::new(
        PEER,
        PEER_IP.into(),
        Duration::from_secs(40),
        Duration::from_secs(5),
    );
    peer.state = NeighborState::Loading;
    peer.priority = 1;
    peer.options = options::E;
    peer.ls_request_list.insert(old.header);
    peer.lsr_rxmt.start();
    h.iface.neighbors.insert(PEER, peer);

    let newer = router_lsa(OTHER, InitialSequenceNumber + 1);
    h.receive(PacketBody::LsUpdate(LsUpdate { lsas: vec![newer] }));
    assert_eq!(h.neighbor().state, NeighborState::Full);
    let peer = &h.iface.neighbors[&PEER];
    assert!(peer.ls_request_list.is_empty());
    assert!(!peer.lsr_rxmt.is_running());
    assert_eq!(peer.state, NeighborState::Full);
}

#[tokio::test]
async fn test_sibling_flood_completes_loading() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    let old = router_lsa(OTHER, InitialSequenceNumber);
    h.add_neighbor(NeighborState::Loading)
        .ls_request_list
        .insert(old.header);

    h.iface.poll(Some(Input::Flood(router_lsa(OTHER, InitialSequenceNumber + 1))));
    assert!(h.neighbor().ls_request_list.is_empty());
    assert_eq!(h.neighbor().state, NeighborState::Full);
}

#[tokio::test]
async fn test_max_age_kept_while_sibling_retransmits() {
    let lsdb = Arc::new(Lsdb::new());
    let mut a = harness_on(ME, ME_IP, 1, 1, lsdb.clone());
    let mut b = harness_on(ME, Ipv4Addr::new(10, 0, 1, 1), 1, 2, lsdb.clone());
    let dead = router_lsa(OTHER, InitialSequenceNumber).with_age(LsaMaxAge);
    let id = dead.identifier();
    lsdb.add_lsa(LsdbScope::Area(AREA), dead.clone(), None);

    b.add_neighbor(NeighborState::Exchange).add_retransmission(dead);
    b.iface.poll(None);
    a.iface.poll(None);
    assert!(lsdb.get_lsa(LsdbScope::Area(AREA), &id).is_some());

    // still waiting for the ack once the exchange is over
    b.iface.neighbors.get_mut(&NBR).unwrap().state = NeighborState::Full;
    b.iface.publish_activity();
    a.iface.poll(None);
    assert!(lsdb.get_lsa(LsdbScope::Area(AREA), &id).is_some());

    b.iface.neighbors.get_mut(&NBR).unwrap().remove_retransmission(&id);
    b.iface.publish_activity();
    a.iface.poll(None);
    assert!(lsdb.get_lsa(LsdbScope::Area(AREA), &id).is_none());
}

#[tokio::test]
async fn test_unchanged_election_leaves_neighbors_alone() {
    let mut h = harness(ME, ME_IP, 5);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.add_neighbor(NeighborState::TwoWay);
    h.iface.run_election();
    assert_eq!(h.iface.state, InterfaceState::DR);
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
    assert!(!h.sent().is_empty());
    let seq = h.neighbor().dd_seq_num;

    h.iface.run_election();
    assert_eq!(h.iface.state, InterfaceState::DR);
    assert_eq!((h.iface.dr, h.iface.bdr), (ME_IP, NBR_IP));
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
    assert_eq!(h.neighbor().dd_seq_num, seq);
    assert!(h.sent().is_empty());
}

#[tokio::test]
async fn test_seq_mismatch_restarts_negotiation() {
    let mut h = harness(ME, ME_IP, 1);
    let lsa = router_lsa(OTHER, InitialSequenceNumber);
    let nbr = h.add_neighbor(NeighborState::Exchange);
    nbr.master = true;
    nbr.dd_seq_num = 100;
    nbr.db_summary_list.insert(lsa.header);
    nbr.ls_request_list.insert(lsa.header);
    nbr.add_retransmission(lsa);

    h.receive(PacketBody::DbDescription(DbDescription {
        interface_mtu: 1500,
        options: options::E,
        flags: DdFlags::empty(),
        dd_sequence_number: 42,
        lsa_headers: vec![],
    }));

    let nbr = h.neighbor();
    assert_eq!(nbr.state, NeighborState::ExStart);
    assert!(nbr.db_summary_list.is_empty());
    assert!(nbr.ls_request_list.is_empty());
    assert!(nbr.ls_retransmission_list.is_empty());
    assert!(!nbr.lsu_rxmt.is_running());
    assert_eq!(nbr.dd_seq_num, 101);

    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    let PacketBody::DbDescription(dd) = &sent[0].0 else {
        panic!("expected a DD packet, got {:?}", sent);
    };
    assert_eq!(dd.flags, DdFlags::I | DdFlags::M | DdFlags::MS);
    assert_eq!(dd.dd_sequence_number, 101);
}

#[tokio::test]
async fn test_slave_answers_duplicate_dd() {
    let mut h = harness(ME, ME_IP, 1);
    h.add_neighbor(NeighborState::ExStart);
    let init = DbDescription {
        interface_mtu: 1500,
        options: options::E,
        flags: DdFlags::I | DdFlags::M | DdFlags::MS,
        dd_sequence_number: 7000,
        lsa_headers: vec![],
    };
    h.receive(PacketBody::DbDescription(init.clone()));
    assert_eq!(h.neighbor().state, NeighborState::Exchange);
    assert!(!h.neighbor().master);
    let first = h.sent();
    assert_eq!(first.len(), 1);

    h.receive(PacketBody::DbDescription(init));
    let again = h.sent();
    assert_eq!(again, first);
    assert_eq!(h.neighbor().state, NeighborState::Exchange);
}

#[tokio::test]
async fn test_bigger_mtu_is_dropped() {
    let mut h = harness(ME, ME_IP, 1);
    h.add_neighbor(NeighborState::ExStart);
    h.receive(PacketBody::DbDescription(DbDescription {
        interface_mtu: 9000,
        options: options::E,
        flags: DdFlags::I | DdFlags::M | DdFlags::MS,
        dd_sequence_number: 1,
        lsa_headers: vec![],
    }));
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
    assert!(h.sent().is_empty());
}

#[tokio::test]
async fn test_ls_request() {
    let mut h = harness(ME, ME_IP, 1);
    let lsa = router_lsa(OTHER, InitialSequenceNumber);
    h.iface
        .lsdb
        .add_lsa(LsdbScope::Area(AREA), lsa.clone(), None);
    h.add_neighbor(NeighborState::Full);

    h.receive(PacketBody::LsRequest(LsRequest {
        requests: vec![lsa.identifier()],
    }));
    let sent = h.sent();
    let (PacketBody::LsUpdate(update), dest) = &sent[0] else {
        panic!("expected an update, got {:?}", sent);
    };
    assert_eq!(*dest, IpAddr::from(NBR_IP));
    assert_eq!(update.lsas[0].identifier(), lsa.identifier());
    assert_eq!(update.lsas[0].header.ls_age, lsa.header.ls_age + 1);

    h.receive(PacketBody::LsRequest(LsRequest {
        requests: vec![lsa.identifier(), router_lsa(NBR, 1).identifier()],
    }));
    assert_eq!(h.neighbor().state, NeighborState::ExStart);
    assert!(h
        .sent()
        .iter()
        .all(|(body, _)| matches!(body, PacketBody::DbDescription(_))));
}

#[tokio::test]
async fn test_ack_stops_retransmission() {
    let mut h = harness(ME, ME_IP, 1);
    let lsa = router_lsa(OTHER, InitialSequenceNumber + 1);
    h.add_neighbor(NeighborState::Full).add_retransmission(lsa.clone());

    let mut stale = lsa.header;
    stale.ls_sequence_number = InitialSequenceNumber;
    h.receive(PacketBody::LsAcknowledge(LsAcknowledge {
        lsa_headers: vec![stale],
    }));
    assert_eq!(h.neighbor().ls_retransmission_list.len(), 1);

    h.receive(PacketBody::LsAcknowledge(LsAcknowledge {
        lsa_headers: vec![lsa.header],
    }));
    assert!(h.neighbor().ls_retransmission_list.is_empty());
    assert!(!h.neighbor().lsu_rxmt.is_running());
}

#[tokio::test]
async fn test_same_instance_is_implied_ack() {
    let mut h = harness(ME, ME_IP, 1);
    let lsa = router_lsa(OTHER, InitialSequenceNumber);
    h.iface
        .lsdb
        .add_lsa(LsdbScope::Area(AREA), lsa.clone(), None);
    h.add_neighbor(NeighborState::Full).add_retransmission(lsa.clone());

    h.receive(PacketBody::LsUpdate(LsUpdate {
        lsas: vec![lsa.clone()],
    }));
    assert!(h.neighbor().ls_retransmission_list.is_empty());
    assert!(h.sent().is_empty());

    // without a pending retransmission the duplicate gets a direct ack
    h.receive(PacketBody::LsUpdate(LsUpdate { lsas: vec![lsa] }));
    let sent = h.sent();
    assert!(matches!(sent[0].0, PacketBody::LsAcknowledge(_)));
}

#[tokio::test(start_paused = true)]
async fn test_older_instance_gets_newer_copy() {
    let mut h = harness(ME, ME_IP, 1);
    let ours = router_lsa(OTHER, InitialSequenceNumber + 5);
    h.iface
        .lsdb
        .add_lsa(LsdbScope::Area(AREA), ours.clone(), None);
    h.add_neighbor(NeighborState::Full);
    tokio::time::advance(Duration::from_secs(2)).await;

    h.receive(PacketBody::LsUpdate(LsUpdate {
        lsas: vec![router_lsa(OTHER, InitialSequenceNumber)],
    }));
    let sent = h.sent();
    let PacketBody::LsUpdate(update) = &sent[0].0 else {
        panic!("expected an update, got {:?}", sent);
    };
    assert_eq!(update.lsas[0].header.ls_sequence_number, InitialSequenceNumber + 5);
}

#[tokio::test]
async fn test_bad_checksum_is_discarded() {
    let mut h = harness(ME, ME_IP, 1);
    h.add_neighbor(NeighborState::Full);
    let mut lsa = router_lsa(OTHER, InitialSequenceNumber);
    lsa.header.ls_checksum ^= 0x1111;
    h.receive(PacketBody::LsUpdate(LsUpdate {
        lsas: vec![lsa.clone()],
    }));
    assert!(h.iface.lsdb.get_lsa(LsdbScope::Area(AREA), &lsa.identifier()).is_none());
    assert!(h.sent().is_empty());
}

#[tokio::test]
async fn test_self_originated_lsa_is_flushed() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.add_neighbor(NeighborState::Full);

    let stray = router_lsa(ME, InitialSequenceNumber + 3);
    h.receive(PacketBody::LsUpdate(LsUpdate {
        lsas: vec![stray.clone()],
    }));
    let installed = h
        .iface
        .lsdb
        .get_lsa(LsdbScope::Area(AREA), &stray.identifier())
        .unwrap();
    assert_eq!(installed.header.ls_age, LsaMaxAge);
    assert_eq!(installed.header.ls_sequence_number, stray.header.ls_sequence_number);
    assert!(h.neighbor().ls_retransmission_list.contains(&stray.identifier()));
}

#[tokio::test]
async fn test_inactivity_removes_neighbor() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.receive(hello(1, AREA, AREA, vec![]));
    assert_eq!(h.neighbor().state, NeighborState::Init);

    h.iface.neighbors[&NBR].inactivity_timer.fire();
    h.iface.poll(None);
    assert!(h.iface.neighbors.is_empty());
}

#[tokio::test]
async fn test_interface_down_kills_neighbors() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.add_neighbor(NeighborState::Full);
    h.iface.interface_event(InterfaceEvent::InterfaceDown);
    assert_eq!(h.iface.state, InterfaceState::Down);
    assert!(h.iface.neighbors.is_empty());
    assert!(!h.iface.hello_timer.is_running());
}

#[tokio::test]
async fn test_dr_originates_network_lsa() {
    let mut h = harness(ME, ME_IP, 1);
    h.iface.interface_event(InterfaceEvent::InterfaceUp);
    h.iface.state = InterfaceState::DR;
    h.iface.dr = ME_IP;
    h.add_neighbor(NeighborState::Loading);
    h.iface
        .neighbor_event(NBR, crate::neighbor::NeighborEvent::LoadingDone);

    let id = h.iface.network_lsa.unwrap();
    let lsa = h.iface.lsdb.get_lsa(LsdbScope::Area(AREA), &id).unwrap();
    assert_eq!(lsa.header.ls_type, types::NetworkLSA);
    assert_eq!(lsa.header.link_state_id, ME_IP);
    assert!(lsa.checksum_valid(Version::V2));
    let mut body = &lsa.body[..];
    let network = ospf_packet::lsa::NetworkLsa::from_buf(&mut body, Version::V2).unwrap();
    assert_eq!(network.attached_routers, vec![ME, NBR]);

    h.iface
        .neighbor_event(NBR, crate::neighbor::NeighborEvent::KillNbr);
    assert!(h.iface.network_lsa.is_none());
    let flushed = h.iface.lsdb.get_lsa(LsdbScope::Area(AREA), &id).unwrap();
    assert!(flushed.header.is_max_age());
}

fn relay(from: &Harness, to: &mut Harness) {
    for (raw, destination) in from.wire.take_raw() {
        to.iface.poll(Some(Input::Packet(Incoming {
            data: Bytes::from(raw),
            source: from.iface.address,
            destination,
        })));
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_routers_converge() {
    let mut a = harness(ME, ME_IP, 1);
    let mut b = harness(NBR, NBR_IP, 1);
    let external = router_lsa(OTHER, InitialSequenceNumber);
    a.iface
        .lsdb
        .add_lsa(LsdbScope::Area(AREA), external.clone(), None);
    a.iface.interface_event(InterfaceEvent::InterfaceUp);
    b.iface.interface_event(InterfaceEvent::InterfaceUp);

    for _ in 0..80 {
        relay(&a, &mut b);
        relay(&b, &mut a);
        a.iface.poll(None);
        b.iface.poll(None);
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }

    assert_eq!(b.iface.state, InterfaceState::DR);
    assert_eq!(a.iface.state, InterfaceState::Backup);
    assert_eq!((a.iface.dr, a.iface.bdr), (NBR_IP, ME_IP));
    assert_eq!((b.iface.dr, b.iface.bdr), (NBR_IP, ME_IP));
    assert_eq!(a.iface.neighbors[&NBR].state, NeighborState::Full);
    assert_eq!(b.iface.neighbors[&ME].state, NeighborState::Full);

    let catalogue = |h: &Harness| {
        h.iface
            .lsdb
            .get_lsa_headers(LsdbScope::Area(AREA), None)
            .into_iter()
            .map(|header| (header.identifier(), header.ls_sequence_number))
            .collect::<Vec<_>>()
    };
    assert_eq!(catalogue(&a), catalogue(&b));
    assert!(b
        .iface
        .lsdb
        .get_lsa(LsdbScope::Area(AREA), &external.identifier())
        .is_some());
    assert!(b.iface.network_lsa.is_some());
    assert!(a.iface.neighbors[&NBR].ls_retransmission_list.is_empty());
    assert!(b.iface.neighbors[&ME].ls_retransmission_list.is_empty());
}
