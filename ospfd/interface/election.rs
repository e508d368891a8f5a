use std::net::Ipv4Addr;

use super::{Interface, InterfaceState};
use crate::log_success;
use crate::neighbor::{NeighborEvent, NeighborState};

/// One router taking part in the DR/BDR election, as seen by the
/// calculating router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub router_id: Ipv4Addr,
    /// Identifier used in DR/BDR fields.
    pub net_id: Ipv4Addr,
    pub priority: u8,
    pub dr: Ipv4Addr,
    pub bdr: Ipv4Addr,
}

impl Candidate {
    fn declares_dr(&self) -> bool {
        self.dr == self.net_id
    }

    fn declares_bdr(&self) -> bool {
        self.bdr == self.net_id
    }
}

fn best<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Option<&'a Candidate> {
    candidates.max_by_key(|c| (c.priority, c.router_id))
}

/// Steps 2 and 3: returns the (DR, BDR) pair, `0.0.0.0` meaning none.
fn elect(routers: &[Candidate]) -> (Ipv4Addr, Ipv4Addr) {
    let eligible = routers.iter().filter(|c| c.priority > 0);

    let not_dr = eligible.clone().filter(|c| !c.declares_dr());
    let bdr = best(not_dr.clone().filter(|c| c.declares_bdr()))
        .or_else(|| best(not_dr))
        .map_or(Ipv4Addr::UNSPECIFIED, |c| c.net_id);

    let dr = best(eligible.filter(|c| c.declares_dr())).map_or(bdr, |c| c.net_id);
    (dr, bdr)
}

/// DR/BDR election run by `me` over the neighbors in state 2-Way or
/// higher. Pure: the caller applies the result.
pub fn election(me: Candidate, neighbors: &[Candidate]) -> (Ipv4Addr, Ipv4Addr) {
    let mut routers = Vec::with_capacity(neighbors.len() + 1);
    routers.push(me);
    routers.extend_from_slice(neighbors);

    let (dr, bdr) = elect(&routers);
    let became_dr = (dr == me.net_id) != me.declares_dr();
    let became_bdr = (bdr == me.net_id) != me.declares_bdr();
    if !(became_dr || became_bdr) {
        return (dr, bdr);
    }
    // our own declaration changed, so the others see a different picture
    routers[0].dr = dr;
    routers[0].bdr = bdr;
    elect(&routers)
}

impl Interface {
    pub(crate) fn run_election(&mut self) {
        let me = Candidate {
            router_id: self.router_id,
            net_id: self.net_id(),
            priority: self.priority,
            dr: self.dr,
            bdr: self.bdr,
        };
        let neighbors: Vec<Candidate> = self
            .neighbors
            .values()
            .filter(|n| n.state >= NeighborState::TwoWay)
            .map(|n| Candidate {
                router_id: n.router_id,
                net_id: n.net_id(),
                priority: n.priority,
                dr: n.dr,
                bdr: n.bdr,
            })
            .collect();
        let (dr, bdr) = election(me, &neighbors);
        let changed = (dr, bdr) != (self.dr, self.bdr);
        self.dr = dr;
        self.bdr = bdr;
        self.state = if self.is_dr() {
            InterfaceState::DR
        } else if self.is_bdr() {
            InterfaceState::Backup
        } else {
            InterfaceState::DROther
        };
        if !changed {
            return;
        }
        log_success!("{}: elected DR {} BDR {}", self.name, dr, bdr);
        let ids: Vec<Ipv4Addr> = self
            .neighbors
            .values()
            .filter(|n| n.state >= NeighborState::TwoWay)
            .map(|n| n.router_id)
            .collect();
        for id in ids {
            self.neighbor_event(id, NeighborEvent::AdjOk);
        }
        self.update_network_lsa();
    }
}
