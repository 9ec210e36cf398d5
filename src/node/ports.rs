//! Logical port allocation.
//!
//! One `PortAllocator` is created per network construction and handed to
//! the node factory by reference, so sequential constructions in the same
//! process never share counters.

/// Default base of the P2P port range.
pub const DEFAULT_P2P_BASE: u16 = 9876;
/// Default base of the HTTP port range.
pub const DEFAULT_HTTP_BASE: u16 = 8888;
/// Distance below each base reserved for the bios node.
pub const BIOS_PORT_OFFSET: u16 = 100;

/// P2P and HTTP port pair assigned to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePorts {
    pub p2p: u16,
    pub http: u16,
}

/// Issues unique ports from two independent monotonic counters.
#[derive(Debug)]
pub struct PortAllocator {
    p2p_base: u16,
    http_base: u16,
    next_p2p: u16,
    next_http: u16,
}

impl PortAllocator {
    pub fn new(p2p_base: u16, http_base: u16) -> Self {
        PortAllocator {
            p2p_base,
            http_base,
            next_p2p: 0,
            next_http: 0,
        }
    }

    /// Next P2P port; counters advance by one per call.
    pub fn next_p2p(&mut self) -> u16 {
        let port = self.p2p_base + self.next_p2p;
        self.next_p2p += 1;
        port
    }

    /// Next HTTP port.
    pub fn next_http(&mut self) -> u16 {
        let port = self.http_base + self.next_http;
        self.next_http += 1;
        port
    }

    /// Fresh pair for a regular node.
    pub fn next_pair(&mut self) -> NodePorts {
        NodePorts {
            p2p: self.next_p2p(),
            http: self.next_http(),
        }
    }

    /// Fixed pair for the bios node; does not touch the counters.
    pub fn bios_ports(&self) -> NodePorts {
        NodePorts {
            p2p: self.p2p_base.saturating_sub(BIOS_PORT_OFFSET),
            http: self.http_base.saturating_sub(BIOS_PORT_OFFSET),
        }
    }
}

impl Default for PortAllocator {
    fn default() -> Self {
        PortAllocator::new(DEFAULT_P2P_BASE, DEFAULT_HTTP_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let mut ports = PortAllocator::default();
        assert_eq!(ports.next_p2p(), 9876);
        assert_eq!(ports.next_p2p(), 9877);
        assert_eq!(ports.next_http(), 8888);
        assert_eq!(ports.next_pair(), NodePorts { p2p: 9878, http: 8889 });
    }

    #[test]
    fn test_bios_ports_sit_below_base() {
        let mut ports = PortAllocator::new(5000, 6000);
        let bios = ports.bios_ports();
        assert_eq!(bios, NodePorts { p2p: 4900, http: 5900 });
        // Asking for bios ports must not consume counter values
        assert_eq!(ports.next_pair(), NodePorts { p2p: 5000, http: 6000 });
        assert_eq!(ports.bios_ports(), bios);
    }

    #[test]
    fn test_fresh_allocators_restart() {
        let mut first = PortAllocator::default();
        first.next_pair();
        first.next_pair();
        let mut second = PortAllocator::default();
        assert_eq!(second.next_pair(), NodePorts { p2p: 9876, http: 8888 });
    }
}
