//! First-come slot registry binding client addresses to paddle slots 2-4
//!
//! The first Input from an unseen address claims the lowest free slot;
//! there is no handshake, no identity check and no removal. A client that
//! stops responding keeps its slot and keeps receiving broadcasts for the
//! life of the process. The registry is also the broadcast target list
//! for State and Chat.

use log::info;
use std::net::SocketAddr;

/// Number of client-claimable slots (slot 1 is reserved for the host).
const CLIENT_SLOTS: usize = 3;

/// Maps peer addresses to paddle slots on a first-seen basis.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    /// Index 0 holds slot 2, index 1 slot 3, index 2 slot 4.
    slots: [Option<SocketAddr>; CLIENT_SLOTS],
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an unseen address to the first free slot in order {2, 3, 4}.
    /// A known address keeps its existing slot. Returns the bound slot
    /// number, or `None` when all three slots are held by other peers —
    /// in which case the sender is never added to the broadcast list,
    /// though its Input messages still drive whatever slot they name.
    pub fn register(&mut self, addr: SocketAddr) -> Option<u8> {
        if let Some(slot) = self.slot_of(addr) {
            return Some(slot);
        }

        for (i, entry) in self.slots.iter_mut().enumerate() {
            if entry.is_none() {
                *entry = Some(addr);
                let slot = (i + 2) as u8;
                info!("client {} registered as paddle slot {}", addr, slot);
                return Some(slot);
            }
        }

        None
    }

    /// Returns the slot bound to an address, if any.
    pub fn slot_of(&self, addr: SocketAddr) -> Option<u8> {
        self.slots
            .iter()
            .position(|entry| *entry == Some(addr))
            .map(|i| (i + 2) as u8)
    }

    /// Broadcast target list, in slot order.
    pub fn addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.slots.iter().filter_map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|entry| entry.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn test_slots_claimed_in_arrival_order() {
        let mut registry = ClientRegistry::new();

        assert_eq!(registry.register(addr(9001)), Some(2));
        assert_eq!(registry.register(addr(9002)), Some(3));
        assert_eq!(registry.register(addr(9003)), Some(4));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_fourth_address_is_not_bound() {
        let mut registry = ClientRegistry::new();
        registry.register(addr(9001));
        registry.register(addr(9002));
        registry.register(addr(9003));

        assert_eq!(registry.register(addr(9004)), None);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.slot_of(addr(9004)), None);
    }

    #[test]
    fn test_known_address_keeps_its_slot() {
        let mut registry = ClientRegistry::new();
        registry.register(addr(9001));
        registry.register(addr(9002));

        assert_eq!(registry.register(addr(9001)), Some(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_broadcast_list_in_slot_order() {
        let mut registry = ClientRegistry::new();
        registry.register(addr(9002));
        registry.register(addr(9001));

        let addrs: Vec<SocketAddr> = registry.addrs().collect();
        assert_eq!(addrs, vec![addr(9002), addr(9001)]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ClientRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.addrs().count(), 0);
    }
}
