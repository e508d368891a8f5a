use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6, UdpSocket};
use std::os::fd::AsRawFd;
use std::time::Duration;

use bytes::Bytes;
use pnet::datalink::{self, NetworkInterface};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;
use socket2::{Domain, InterfaceIndexOrAddress, Protocol, SockAddr, Socket, Type};
use tokio::sync::mpsc;

use crate::config::InterfaceConfig;
use crate::constant::{AllDRouters, AllDRoutersV6, AllSPFRouters, AllSPFRoutersV6, OspfProtocol};
use crate::error::Error;
use crate::interface::{Incoming, Input};
use crate::sender::Transport;
use crate::{log, log_error};

/// How often the receiver thread checks whether its interface is gone.
const RECV_TIMEOUT: Duration = Duration::from_secs(1);
/// Offset of the checksum field in the OSPFv3 header.
const V3_CHECKSUM_OFFSET: libc::c_int = 12;

/// Raw IP socket bound to one link, joined to AllSPFRouters and AllDRouters.
pub struct SocketTransport {
    socket: Socket,
    ifindex: u32,
}

impl Transport for SocketTransport {
    fn send(&mut self, data: &[u8], destination: IpAddr) -> io::Result<()> {
        let addr: SocketAddr = match destination {
            IpAddr::V4(addr) => SocketAddrV4::new(addr, 0).into(),
            IpAddr::V6(addr) => SocketAddrV6::new(addr, 0, 0, self.ifindex).into(),
        };
        self.socket.send_to(data, &SockAddr::from(addr)).map(|_| ())
    }
}

fn find_interface(name: &str) -> Result<NetworkInterface, Error> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// Opens the OSPF socket of the configured link. A dedicated thread pushes
/// every received packet into `inbound` until that queue is closed.
pub fn open(config: &InterfaceConfig, inbound: mpsc::Sender<Input>) -> Result<SocketTransport, Error> {
    let nic = find_interface(&config.name)?;
    let socket = match config.address.addr() {
        IpAddr::V4(addr) => ipv4_socket(&nic, addr)?,
        IpAddr::V6(addr) => ipv6_socket(&nic, addr)?,
    };
    socket.bind_device(Some(nic.name.as_bytes()))?;
    socket.set_read_timeout(Some(RECV_TIMEOUT))?;

    let reader: UdpSocket = socket.try_clone()?.into();
    let is_v6 = config.address.addr().is_ipv6();
    let name = nic.name.clone();
    std::thread::Builder::new()
        .name(format!("ospf-recv-{}", nic.name))
        .spawn(move || receive_loop(name, reader, is_v6, inbound))?;
    log!("{}: raw socket open on ifindex {}", nic.name, nic.index);
    Ok(SocketTransport {
        socket,
        ifindex: nic.index,
    })
}

fn ipv4_socket(nic: &NetworkInterface, addr: Ipv4Addr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::from(OspfProtocol)))?;
    let index = InterfaceIndexOrAddress::Index(nic.index);
    socket.join_multicast_v4_n(&AllSPFRouters, &index)?;
    socket.join_multicast_v4_n(&AllDRouters, &index)?;
    socket.set_multicast_if_v4(&addr)?;
    socket.set_multicast_ttl_v4(1)?;
    socket.set_multicast_loop_v4(false)?;
    socket.set_ttl(1)?;
    Ok(socket)
}

fn ipv6_socket(nic: &NetworkInterface, addr: Ipv6Addr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV6, Type::RAW, Some(Protocol::from(OspfProtocol)))?;
    socket.join_multicast_v6(&AllSPFRoutersV6, nic.index)?;
    socket.join_multicast_v6(&AllDRoutersV6, nic.index)?;
    socket.set_multicast_if_v6(nic.index)?;
    socket.set_multicast_hops_v6(1)?;
    socket.set_multicast_loop_v6(false)?;
    socket.set_unicast_hops_v6(1)?;
    socket.bind(&SockAddr::from(SocketAddrV6::new(addr, 0, 0, nic.index)))?;

    // the kernel computes the checksum over the IPv6 pseudo-header
    let offset = V3_CHECKSUM_OFFSET;
    let ret = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::IPPROTO_IPV6,
            libc::IPV6_CHECKSUM,
            &offset as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(socket)
}

fn receive_loop(name: String, socket: UdpSocket, is_v6: bool, inbound: mpsc::Sender<Input>) {
    let mut buf = vec![0u8; u16::MAX as usize];
    while !inbound.is_closed() {
        let (len, from) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                continue
            }
            Err(e) => {
                log_error!("{}: receive failed: {}", name, e);
                break;
            }
        };
        let incoming = if is_v6 {
            // raw IPv6 sockets deliver the payload only
            Incoming {
                data: Bytes::copy_from_slice(&buf[..len]),
                source: from.ip(),
                destination: Ipv6Addr::UNSPECIFIED.into(),
            }
        } else {
            let Some(ip) = Ipv4Packet::new(&buf[..len]) else {
                continue;
            };
            Incoming {
                data: Bytes::copy_from_slice(ip.payload()),
                source: ip.get_source().into(),
                destination: ip.get_destination().into(),
            }
        };
        if inbound.blocking_send(Input::Packet(incoming)).is_err() {
            break;
        }
    }
    log!("{}: receiver stopped", name);
}
