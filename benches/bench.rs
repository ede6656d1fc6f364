#![feature(test)]

mod iface {
    use std::io::Write as _;

    use rand::{Rng, SeedableRng};
    use smolrouter::iface::{InterfaceConfig, Interfaces, RouteEntry, Router, Routes};
    use smolrouter::phy::{Frame, InterfaceId, QueueDevice};
    use smolrouter::wire::{
        ArpOperation, ArpPacket, ArpRepr, EthernetAddress, EthernetFrame, EthernetProtocol,
        EthernetRepr, IpProtocol, Ipv4Address, Ipv4Packet, Ipv4Repr,
    };

    extern crate test;

    const ROUTE_COUNT: usize = 64 * 1024;

    // Off unless RUST_LOG asks for it; per-frame tracing would swamp the timings.
    fn setup_logging() {
        let _ = env_logger::Builder::from_default_env()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "({}): {}",
                    record.target().replace("smolrouter::", ""),
                    record.args()
                )
            })
            .try_init();
    }

    fn random_routes(rng: &mut impl Rng) -> Vec<RouteEntry> {
        (0..ROUTE_COUNT)
            .map(|n| {
                let prefix_len = rng.gen_range(8..=32u32);
                RouteEntry {
                    prefix: Ipv4Address::from_bits(rng.gen()),
                    next_hop: Ipv4Address::new(10, 0, 0, 2),
                    mask: Ipv4Address::from_bits(u32::MAX << (32 - prefix_len)),
                    interface: InterfaceId(n % 2),
                }
            })
            .collect()
    }

    #[bench]
    fn bench_build_routes(b: &mut test::Bencher) {
        setup_logging();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let entries = random_routes(&mut rng);

        b.iter(|| Routes::build(entries.clone()));
    }

    #[bench]
    fn bench_lookup(b: &mut test::Bencher) {
        setup_logging();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let routes = Routes::build(random_routes(&mut rng));
        let addrs: Vec<Ipv4Address> = (0..1024)
            .map(|_| Ipv4Address::from_bits(rng.gen()))
            .collect();

        b.iter(|| {
            addrs
                .iter()
                .filter(|&&addr| routes.lookup(addr).is_some())
                .count()
        });
    }

    #[bench]
    fn bench_forward(b: &mut test::Bencher) {
        setup_logging();
        let mac_in = EthernetAddress([0x02, 0, 0, 0, 0, 0x01]);
        let mac_out = EthernetAddress([0x02, 0, 0, 0, 0, 0x02]);
        let interfaces = Interfaces::new(vec![
            InterfaceConfig::new(mac_in, Ipv4Address::new(192, 168, 1, 1)),
            InterfaceConfig::new(mac_out, Ipv4Address::new(10, 0, 0, 1)),
        ]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let routes = Routes::build(random_routes(&mut rng));
        let mut router = Router::new(interfaces, routes).unwrap();
        let mut device = QueueDevice::new();

        // Every route shares one next hop; resolve it up front.
        let arp_repr = ArpRepr {
            operation: ArpOperation::Reply,
            source_hardware_addr: EthernetAddress([0x02, 0, 0, 0, 0, 0x20]),
            source_protocol_addr: Ipv4Address::new(10, 0, 0, 2),
            target_hardware_addr: mac_out,
            target_protocol_addr: Ipv4Address::new(10, 0, 0, 1),
        };
        let arp_eth_repr = EthernetRepr {
            src_addr: arp_repr.source_hardware_addr,
            dst_addr: mac_out,
            ethertype: EthernetProtocol::Arp,
        };
        let mut arp_bytes = vec![0; arp_eth_repr.buffer_len() + arp_repr.buffer_len()];
        let mut arp_frame = EthernetFrame::new_unchecked(&mut arp_bytes[..]);
        arp_eth_repr.emit(&mut arp_frame);
        arp_repr.emit(&mut ArpPacket::new_unchecked(arp_frame.payload_mut()));
        router
            .process(&mut device, Frame::new(InterfaceId(1), arp_bytes))
            .unwrap();

        let eth_repr = EthernetRepr {
            src_addr: EthernetAddress([0x02, 0, 0, 0, 0, 0x10]),
            dst_addr: mac_in,
            ethertype: EthernetProtocol::Ipv4,
        };
        let ipv4_repr = Ipv4Repr {
            src_addr: Ipv4Address::new(192, 168, 1, 2),
            dst_addr: Ipv4Address::new(8, 8, 8, 8),
            next_header: IpProtocol::Udp,
            payload_len: 400,
            hop_limit: 64,
        };
        let mut bytes = vec![0x2a; eth_repr.buffer_len() + ipv4_repr.buffer_len() + 400];
        let mut eth_frame = EthernetFrame::new_unchecked(&mut bytes[..]);
        eth_repr.emit(&mut eth_frame);
        ipv4_repr.emit(&mut Ipv4Packet::new_unchecked(eth_frame.payload_mut()));

        b.iter(|| {
            let frame = Frame::new(InterfaceId(0), bytes.clone());
            let outcome = router.process(&mut device, frame);
            device.tx_queue.clear();
            outcome
        });
    }
}
