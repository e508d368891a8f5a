use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::InterfaceConfig;
use crate::database::{Lsdb, LsdbScope};
use crate::error::Error;
use crate::flooding::{FloodReceiver, FloodSender, Flooded};
use crate::interface::{listen_interface, Input, Interface, InterfaceContext};
use crate::sender::Transport;
use crate::{log, log_error, log_success};

const INBOUND_CAPACITY: usize = 256;

struct Link {
    interface_id: u32,
    area_id: Ipv4Addr,
    inbound: mpsc::Sender<Input>,
}

type Links = Arc<Mutex<Vec<Link>>>;

/// Owns everything the interfaces of one router share: the LSDB, the
/// interface ID counter and the flooding pipeline.
pub struct Router {
    pub router_id: Ipv4Addr,
    pub is_abr: bool,
    pub lsdb: Arc<Lsdb>,
    next_interface_id: u32,
    flooding: FloodSender,
    links: Links,
    shutdown: watch::Sender<bool>,
    workers: Vec<JoinHandle<Interface>>,
    distributor: JoinHandle<()>,
}

impl Router {
    pub fn new(router_id: Ipv4Addr, is_abr: bool) -> Self {
        let (flooding, flooded) = mpsc::unbounded_channel();
        let links = Links::default();
        let distributor = tokio::spawn(distribute(flooded, links.clone()));
        let (shutdown, _) = watch::channel(false);
        Self {
            router_id,
            is_abr,
            lsdb: Arc::new(Lsdb::new()),
            next_interface_id: 1,
            flooding,
            links,
            shutdown,
            workers: vec![],
            distributor,
        }
    }

    /// Creates the interface described by `config` and starts its worker.
    /// `connect` receives the inbound queue of the new interface and returns
    /// the transport it sends through.
    ///
    /// Returns the inbound queue.
    pub fn add_interface<F>(&mut self, config: &InterfaceConfig, connect: F) -> Result<mpsc::Sender<Input>, Error>
    where
        F: FnOnce(mpsc::Sender<Input>) -> Result<Box<dyn Transport>, Error>,
    {
        let ctx = InterfaceContext {
            router_id: self.router_id,
            interface_id: self.next_interface_id,
            is_abr: self.is_abr,
            lsdb: self.lsdb.clone(),
            flooding: self.flooding.clone(),
        };
        let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);
        let transport = connect(tx.clone())?;
        let iface = Interface::new(config, ctx, transport)?;
        self.next_interface_id += 1;

        lock(&self.links).push(Link {
            interface_id: iface.interface_id,
            area_id: iface.area_id,
            inbound: tx.clone(),
        });
        log_success!(
            "router {}: interface {} added with id {}",
            self.router_id,
            iface.name,
            iface.interface_id
        );
        let worker = tokio::spawn(listen_interface(iface, rx, self.shutdown.subscribe()));
        self.workers.push(worker);
        Ok(tx)
    }

    /// Stops every interface worker and waits for them. Each interface is
    /// brought down before its worker returns.
    pub async fn shutdown(self) -> Vec<Interface> {
        let Router {
            router_id,
            flooding,
            links,
            shutdown,
            workers,
            distributor,
            ..
        } = self;
        // receivers may already be gone, nothing to report then
        let _ = shutdown.send(true);
        let mut stopped = Vec::with_capacity(workers.len());
        for worker in workers {
            match worker.await {
                Ok(iface) => stopped.push(iface),
                Err(e) => log_error!("router {}: interface worker failed: {}", router_id, e),
            }
        }
        lock(&links).clear();
        drop(flooding);
        distributor.abort();
        log!("router {} stopped", router_id);
        stopped
    }
}

fn lock(links: &Links) -> std::sync::MutexGuard<'_, Vec<Link>> {
    links.lock().unwrap_or_else(|e| e.into_inner())
}

/// Interfaces that must see `flooded`: every other interface of the same
/// area, or of any area for AS-scoped LSAs.
fn recipients(links: &[Link], flooded: &Flooded) -> Vec<mpsc::Sender<Input>> {
    links
        .iter()
        .filter(|link| link.interface_id != flooded.interface_id)
        .filter(|link| flooded.scope == LsdbScope::As || link.area_id == flooded.area_id)
        .map(|link| link.inbound.clone())
        .collect()
}

async fn distribute(mut flooded: FloodReceiver, links: Links) {
    while let Some(item) = flooded.recv().await {
        let targets = recipients(&lock(&links), &item);
        for target in targets {
            if target.send(Input::Flood(item.lsa.clone())).await.is_err() {
                log!("flooding {}: interface already stopped", item.lsa.identifier());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::net::IpAddr;
    use std::time::Duration;

    use bytes::Bytes;
    use ipnet::IpNet;
    use ospf_packet::lsa::{Lsa, LsaHeader};
    use ospf_packet::{PacketBody, Version};

    use super::*;
    use crate::interface::InterfaceState;
    use crate::sender::MemoryTransport;

    fn link(interface_id: u32, area: u8) -> (Link, mpsc::Receiver<Input>) {
        let (inbound, rx) = mpsc::channel(4);
        let link = Link {
            interface_id,
            area_id: Ipv4Addr::new(0, 0, 0, area),
            inbound,
        };
        (link, rx)
    }

    fn flooded(interface_id: u32, scope: LsdbScope) -> Flooded {
        let header = LsaHeader {
            ls_age: 1,
            options: 0,
            ls_type: 5,
            link_state_id: Ipv4Addr::new(10, 0, 0, 0),
            advertising_router: Ipv4Addr::new(9, 9, 9, 9),
            ls_sequence_number: 0x80000001,
            ls_checksum: 0,
            length: 0,
        };
        Flooded {
            interface_id,
            area_id: Ipv4Addr::UNSPECIFIED,
            scope,
            lsa: Lsa::new(header, Bytes::from_static(&[0; 16]), Version::V2),
        }
    }

    #[test]
    fn test_recipients() {
        let (a, _ra) = link(1, 0);
        let (b, mut rb) = link(2, 0);
        let (c, mut rc) = link(3, 1);
        let links = vec![a, b, c];

        let area = recipients(&links, &flooded(1, LsdbScope::Area(Ipv4Addr::UNSPECIFIED)));
        assert_eq!(area.len(), 1);
        assert!(area[0].try_send(Input::Flood(flooded(1, LsdbScope::As).lsa)).is_ok());
        assert!(rb.try_recv().is_ok());
        assert!(rc.try_recv().is_err());

        let external = recipients(&links, &flooded(1, LsdbScope::As));
        assert_eq!(external.len(), 2);
        let own = recipients(&links, &flooded(3, LsdbScope::As));
        assert_eq!(own.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_router_lifecycle() {
        let mut router = Router::new(Ipv4Addr::new(1, 1, 1, 1), false);
        let transport = MemoryTransport::default();
        let config = InterfaceConfig {
            name: "eth0".to_string(),
            address: "10.0.0.1/24".parse::<IpNet>().unwrap(),
            ..Default::default()
        };
        let recorded = transport.clone();
        router
            .add_interface(&config, |_| Ok(Box::new(recorded) as Box<dyn Transport>))
            .unwrap();

        let bad = InterfaceConfig {
            version: 4,
            ..config.clone()
        };
        let rejected = router.add_interface(&bad, |_| {
            Ok(Box::new(MemoryTransport::default()) as Box<dyn Transport>)
        });
        assert!(rejected.is_err());

        tokio::time::sleep(Duration::from_secs(11)).await;
        let sent = transport.take();
        assert!(sent.iter().any(|(packet, dest)| {
            matches!(packet.body, PacketBody::Hello(_))
                && *dest == IpAddr::from(Ipv4Addr::new(224, 0, 0, 5))
        }));

        let stopped = router.shutdown().await;
        assert_eq!(stopped.len(), 1);
        assert_eq!(stopped[0].interface_id, 1);
        assert_eq!(stopped[0].state, InterfaceState::Down);
    }
}
