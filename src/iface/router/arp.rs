use super::{check, dispatch, rewrite_l2, Outcome, Port, Router};
use crate::phy::{Device, Frame};
use crate::wire::*;
use crate::Result;

impl Router {
    pub(super) fn process_arp<D>(
        &mut self,
        device: &mut D,
        port: Port,
        frame: Frame,
    ) -> Result<Outcome>
    where
        D: Device + ?Sized,
    {
        let (eth_src, arp_repr) = {
            let eth_frame = EthernetFrame::new_unchecked(&frame.buffer[..]);
            let arp_packet = ArpPacket::new_unchecked(eth_frame.payload());
            (eth_frame.src_addr(), check!(ArpRepr::parse(&arp_packet)))
        };

        // Only process ARP packets for us.
        if arp_repr.target_protocol_addr != port.ip {
            net_trace!("router: ignoring {}", arp_repr);
            return Ok(Outcome::Ignored);
        }

        match arp_repr.operation {
            ArpOperation::Request => {
                let reply = arp_repr.reply_to(port.mac);
                self.arp_send(device, port, eth_src, &reply)?;
                Ok(Outcome::ArpReplied)
            }
            ArpOperation::Reply => {
                self.arp_cache.insert(
                    arp_repr.source_protocol_addr,
                    arp_repr.source_hardware_addr,
                )?;
                let drained = self.drain(device);
                Ok(Outcome::ArpLearned { drained })
            }
            ArpOperation::Unknown(_op) => {
                net_debug!("router: unknown ARP operation {}", _op);
                Ok(Outcome::Ignored)
            }
        }
    }

    /// Broadcast a request for `target` out of `port`.
    pub(super) fn arp_request<D>(
        &self,
        device: &mut D,
        port: Port,
        target: Ipv4Address,
    ) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let request = ArpRepr::request(port.mac, port.ip, target);
        self.arp_send(device, port, EthernetAddress::BROADCAST, &request)
    }

    fn arp_send<D>(
        &self,
        device: &mut D,
        port: Port,
        dst_mac: EthernetAddress,
        arp_repr: &ArpRepr,
    ) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let eth_repr = EthernetRepr {
            src_addr: port.mac,
            dst_addr: dst_mac,
            ethertype: EthernetProtocol::Arp,
        };

        let len = eth_repr.buffer_len() + arp_repr.buffer_len();
        let mut frame = Frame::try_zeroed(port.id, len)?;
        {
            let mut eth_frame = EthernetFrame::new_unchecked(&mut frame.buffer[..]);
            eth_repr.emit(&mut eth_frame);
            arp_repr.emit(&mut ArpPacket::new_unchecked(eth_frame.payload_mut()));
        }

        net_trace!("router: {}", arp_repr);
        dispatch(device, frame);
        Ok(())
    }

    /// Send waiting frames, oldest first, for as long as the one at the head
    /// of the queue has a resolved next hop. Returns how many were sent.
    fn drain<D>(&mut self, device: &mut D) -> usize
    where
        D: Device + ?Sized,
    {
        let mut drained = 0;
        while let Some((out, next_hop_mac)) =
            self.pending.peek().and_then(|head| self.resolve(head))
        {
            let mut frame = self.pending.dequeue();
            rewrite_l2(&mut frame, out, next_hop_mac);
            dispatch(device, frame);
            drained += 1;
        }

        if !self.pending.is_empty() {
            net_debug!("router: {} datagrams still waiting", self.pending.len());
        }
        drained
    }

    /// Find the outgoing port and next hop hardware address for a queued frame.
    fn resolve(&self, frame: &Frame) -> Option<(Port, EthernetAddress)> {
        let ip_payload = frame.buffer.get(ETHERNET_HEADER_LEN..)?;
        let ipv4_packet = Ipv4Packet::new_checked(ip_payload).ok()?;
        let route = self.routes.lookup(ipv4_packet.dst_addr())?;
        let out = self.port(route.interface)?;
        let next_hop_mac = self.arp_cache.find(route.next_hop)?;
        Some((out, next_hop_mac))
    }
}
