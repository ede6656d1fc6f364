use core::cmp;

use super::{check, dispatch, rewrite_l2, DropReason, Outcome, Port, Router};
use crate::config::{ICMP_ERROR_QUOTE_LEN, ICMP_TTL};
use crate::phy::{Device, Frame};
use crate::wire::*;
use crate::Result;

impl Router {
    pub(super) fn process_ipv4<D>(
        &mut self,
        device: &mut D,
        port: Port,
        mut frame: Frame,
    ) -> Result<Outcome>
    where
        D: Device + ?Sized,
    {
        let ipv4_repr = {
            let ipv4_packet = check!(Ipv4Packet::new_checked(
                &frame.buffer[ETHERNET_HEADER_LEN..]
            ));
            check!(Ipv4Repr::parse(&ipv4_packet))
        };

        if ipv4_repr.hop_limit <= 1 {
            net_debug!("router: ttl expired for {}", ipv4_repr);
            self.icmpv4_error(
                device,
                port,
                &frame,
                |data| Icmpv4Repr::TimeExceeded {
                    reason: Icmpv4TimeExceeded::TtlExpired,
                    data,
                },
            )?;
            return Ok(Outcome::TimeExceeded);
        }

        if ipv4_repr.dst_addr == port.ip && ipv4_repr.next_header == IpProtocol::Icmp {
            let msg_type = {
                let ipv4_packet = Ipv4Packet::new_unchecked(&frame.buffer[ETHERNET_HEADER_LEN..]);
                check!(Icmpv4Packet::new_checked(ipv4_packet.payload())).msg_type()
            };
            if msg_type == Icmpv4Message::EchoRequest {
                self.echo_reply(device, port, &frame, &ipv4_repr)?;
                return Ok(Outcome::EchoReplied);
            }
        }

        let route = match self.routes.lookup(ipv4_repr.dst_addr) {
            Some(route) => *route,
            None => {
                net_debug!("router: no route to {}", ipv4_repr.dst_addr);
                self.icmpv4_error(device, port, &frame, |data| {
                    Icmpv4Repr::DstUnreachable {
                        reason: Icmpv4DstUnreachable::NetUnreachable,
                        data,
                    }
                })?;
                return Ok(Outcome::Unreachable);
            }
        };

        let out = match self.port(route.interface) {
            Some(out) => out,
            None => {
                net_debug!("router: route {} uses an unknown interface", route);
                return Ok(Outcome::Dropped(DropReason::UnknownInterface));
            }
        };

        Ipv4Packet::new_unchecked(&mut frame.buffer[ETHERNET_HEADER_LEN..]).decrement_hop_limit();

        match self.arp_cache.find(route.next_hop) {
            Some(next_hop_mac) => {
                rewrite_l2(&mut frame, out, next_hop_mac);
                dispatch(device, frame);
                Ok(Outcome::Forwarded { interface: out.id })
            }
            None => {
                net_debug!(
                    "router: {} unresolved, queueing datagram for {}",
                    route.next_hop,
                    ipv4_repr.dst_addr
                );
                self.pending.enqueue(frame)?;
                self.arp_request(device, out, route.next_hop)?;
                Ok(Outcome::Queued {
                    next_hop: route.next_hop,
                })
            }
        }
    }

    /// Answer the echo request carried by `frame`.
    ///
    /// Only the message type is trusted: the code and the ICMP checksum of
    /// the request are not checked, and the reply gets a fresh checksum.
    fn echo_reply<D>(
        &self,
        device: &mut D,
        port: Port,
        frame: &Frame,
        ipv4_repr: &Ipv4Repr,
    ) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let eth_frame = EthernetFrame::new_unchecked(&frame.buffer[..]);
        let ipv4_packet = Ipv4Packet::new_unchecked(eth_frame.payload());
        let icmp_packet = Icmpv4Packet::new_unchecked(ipv4_packet.payload());
        if icmp_packet.msg_code() != 0 || !icmp_packet.verify_checksum() {
            net_debug!(
                "router: answering irregular echo request from {}",
                ipv4_repr.src_addr
            );
        }

        let icmp_repr = Icmpv4Repr::EchoReply {
            ident: icmp_packet.echo_ident(),
            seq_no: icmp_packet.echo_seq_no(),
            data: icmp_packet.data(),
        };
        net_trace!("router: echo request from {}", ipv4_repr.src_addr);
        self.icmpv4_send(
            device,
            port,
            eth_frame.src_addr(),
            ipv4_repr.src_addr,
            &icmp_repr,
        )
    }

    /// Report a problem with the datagram in `frame` back to its sender,
    /// quoting its header and the first octets of its payload as received.
    fn icmpv4_error<'a, D, F>(
        &self,
        device: &mut D,
        port: Port,
        frame: &'a Frame,
        make_repr: F,
    ) -> Result<()>
    where
        D: Device + ?Sized,
        F: FnOnce(&'a [u8]) -> Icmpv4Repr<'a>,
    {
        let eth_frame = EthernetFrame::new_unchecked(&frame.buffer[..]);
        let ipv4_packet = Ipv4Packet::new_unchecked(eth_frame.payload());
        let quote_len = cmp::min(
            ipv4_packet.header_len() as usize + ICMP_ERROR_QUOTE_LEN,
            ipv4_packet.total_len() as usize,
        );
        let icmp_repr = make_repr(&eth_frame.payload()[..quote_len]);

        self.icmpv4_send(
            device,
            port,
            eth_frame.src_addr(),
            ipv4_packet.src_addr(),
            &icmp_repr,
        )
    }

    /// Emit `icmp_repr` from `port` to `dst_addr`, reachable at `dst_mac`.
    fn icmpv4_send<D>(
        &self,
        device: &mut D,
        port: Port,
        dst_mac: EthernetAddress,
        dst_addr: Ipv4Address,
        icmp_repr: &Icmpv4Repr,
    ) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let eth_repr = EthernetRepr {
            src_addr: port.mac,
            dst_addr: dst_mac,
            ethertype: EthernetProtocol::Ipv4,
        };
        let ipv4_repr = Ipv4Repr {
            src_addr: port.ip,
            dst_addr,
            next_header: IpProtocol::Icmp,
            payload_len: icmp_repr.buffer_len(),
            hop_limit: ICMP_TTL,
        };

        let len = eth_repr.buffer_len() + ipv4_repr.buffer_len() + ipv4_repr.payload_len;
        let mut reply = Frame::try_zeroed(port.id, len)?;
        {
            let mut eth_frame = EthernetFrame::new_unchecked(&mut reply.buffer[..]);
            eth_repr.emit(&mut eth_frame);

            let mut ipv4_packet = Ipv4Packet::new_unchecked(eth_frame.payload_mut());
            ipv4_repr.emit(&mut ipv4_packet);

            let mut icmp_packet = Icmpv4Packet::new_unchecked(ipv4_packet.payload_mut());
            icmp_repr.emit(&mut icmp_packet);
        }

        net_trace!("router: {} {}", ipv4_repr, icmp_repr);
        dispatch(device, reply);
        Ok(())
    }
}
