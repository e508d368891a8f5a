use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ospf_packet::lsa::{Lsa, LsaHeader, LsaIdentifier};
use tokio::time::Instant;

use crate::constant::LsaMaxAge;

/// Partition of the database an LSA lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LsdbScope {
    /// OSPFv3 link-local scope, keyed by interface ID.
    Link(u32),
    Area(Ipv4Addr),
    As,
}

#[derive(Debug, Clone)]
pub struct LsdbEntry {
    /// Stored copy; its age is the age at install time.
    lsa: Lsa,
    pub installed: Instant,
    /// Interface that originated this LSA, `None` for LSAs learned from
    /// neighbors.
    pub origin: Option<u32>,
}

impl LsdbEntry {
    fn age(&self) -> u16 {
        let age = self.lsa.header.ls_age as u64 + self.installed.elapsed().as_secs();
        age.min(LsaMaxAge as u64) as u16
    }

    /// The stored instance with its current age.
    pub fn lsa(&self) -> Lsa {
        self.lsa.with_age(self.age())
    }

    pub fn header(&self) -> LsaHeader {
        let mut header = self.lsa.header;
        header.ls_age = self.age();
        header
    }
}

type Key = (LsdbScope, LsaIdentifier);

/// What the neighbors of one interface still hold on to, as of the end of
/// its last pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    /// Some neighbor is in Exchange or Loading.
    pub exchanging: bool,
    /// LSAs waiting on some neighbor's retransmission list.
    pub retransmitting: BTreeSet<LsaIdentifier>,
}

/// Link state database shared by every interface of a router. Each call
/// holds the lock for exactly one logical operation.
#[derive(Debug, Default)]
pub struct Lsdb {
    entries: Mutex<BTreeMap<Key, LsdbEntry>>,
    /// Per interface ID. MaxAge LSAs stay installed while any interface
    /// reports them.
    activity: Mutex<BTreeMap<u32, Activity>>,
}

impl Lsdb {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Key, LsdbEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_lsa(&self, scope: LsdbScope, id: &LsaIdentifier) -> Option<Lsa> {
        self.lock().get(&(scope, *id)).map(LsdbEntry::lsa)
    }

    pub fn get_entry(&self, scope: LsdbScope, id: &LsaIdentifier) -> Option<LsdbEntry> {
        self.lock().get(&(scope, *id)).cloned()
    }

    /// Headers of every LSA in `scope`, restricted to one advertising router
    /// when `adv_router` is given.
    pub fn get_lsa_headers(&self, scope: LsdbScope, adv_router: Option<Ipv4Addr>) -> Vec<LsaHeader> {
        self.lock()
            .iter()
            .filter(|((s, id), _)| {
                *s == scope && adv_router.map_or(true, |r| id.advertising_router == r)
            })
            .map(|(_, entry)| entry.header())
            .collect()
    }

    /// Installs `lsa`, replacing any previous instance, and returns the
    /// replaced one.
    pub fn add_lsa(&self, scope: LsdbScope, lsa: Lsa, origin: Option<u32>) -> Option<Lsa> {
        let entry = LsdbEntry {
            lsa,
            installed: Instant::now(),
            origin,
        };
        self.lock()
            .insert((scope, entry.lsa.identifier()), entry)
            .map(|old| old.lsa())
    }

    pub fn delete_lsa(&self, scope: LsdbScope, id: &LsaIdentifier) -> Option<Lsa> {
        self.lock().remove(&(scope, *id)).map(|old| old.lsa())
    }

    pub fn max_age_lsas(&self, scopes: &[LsdbScope]) -> Vec<(LsdbScope, Lsa)> {
        self.lock()
            .iter()
            .filter(|((scope, _), entry)| scopes.contains(scope) && entry.age() >= LsaMaxAge)
            .map(|((scope, _), entry)| (*scope, entry.lsa()))
            .collect()
    }

    /// LSAs that the interface `origin` originated itself.
    pub fn self_originated(&self, scopes: &[LsdbScope], origin: u32) -> Vec<(LsdbScope, Lsa)> {
        self.lock()
            .iter()
            .filter(|((scope, _), entry)| scopes.contains(scope) && entry.origin == Some(origin))
            .map(|((scope, _), entry)| (*scope, entry.lsa()))
            .collect()
    }

    pub fn set_activity(&self, interface_id: u32, activity: Activity) {
        let mut all = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        if activity == Activity::default() {
            all.remove(&interface_id);
        } else {
            all.insert(interface_id, activity);
        }
    }

    /// Whether an interface other than `interface_id` has a neighbor in
    /// Exchange or Loading.
    pub fn exchanging_elsewhere(&self, interface_id: u32) -> bool {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(other, activity)| *other != interface_id && activity.exchanging)
    }

    /// Whether an interface other than `interface_id` still retransmits `id`.
    pub fn retransmitting_elsewhere(&self, interface_id: u32, id: &LsaIdentifier) -> bool {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(other, activity)| *other != interface_id && activity.retransmitting.contains(id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
