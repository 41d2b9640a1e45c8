use log::debug;

use crate::constants::TLB_ENTRIES;

/// One cached page -> frame mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TlbEntry {
    page: u32,
    frame: u32,
}

/// Translation-lookaside buffer: a 16-slot associative cache of page -> frame
/// mappings with strict FIFO replacement.
///
/// Lookup is a linear scan in slot order, modeling the associative probe of a
/// small hardware TLB rather than a hashed software cache. Once every slot is
/// occupied, the occupied slots read oldest -> newest from slot 0 upward;
/// eviction order is insertion order, never recency of use.
pub struct Tlb {
    slots: [Option<TlbEntry>; TLB_ENTRIES],
}

impl Tlb {
    pub fn new() -> Self {
        Tlb {
            slots: [None; TLB_ENTRIES],
        }
    }

    /// Cached frame for `page`, or a miss. First match in slot order wins;
    /// pages are unique per slot so ties cannot occur.
    pub fn lookup(&self, page: u32) -> Option<u32> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }

    /// Cache a mapping freshly resolved through the page table.
    ///
    /// While the cache is warming up, the first empty slot in scan order is
    /// filled. Once full, the oldest entry (slot 0) is discarded, everything
    /// shifts one slot toward the front, and the new pair lands in the last
    /// slot. Called only after a miss; a hit never re-inserts or reorders.
    pub fn insert(&mut self, page: u32, frame: u32) {
        let entry = Some(TlbEntry { page, frame });

        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = entry;
            return;
        }

        if let Some(oldest) = self.slots[0] {
            debug!("tlb evict: page {} (fifo)", oldest.page);
        }
        self.slots.rotate_left(1);
        self.slots[TLB_ENTRIES - 1] = entry;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Tlb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tlb_misses() {
        let tlb = Tlb::new();
        assert!(tlb.is_empty());
        assert_eq!(tlb.lookup(0), None);
        assert_eq!(tlb.lookup(255), None);
    }

    #[test]
    fn test_insert_then_lookup() {
        let mut tlb = Tlb::new();
        tlb.insert(7, 3);

        assert_eq!(tlb.lookup(7), Some(3));
        assert_eq!(tlb.lookup(8), None);
        assert_eq!(tlb.len(), 1);
    }

    #[test]
    fn test_fills_up_to_capacity() {
        let mut tlb = Tlb::new();
        for page in 0..TLB_ENTRIES as u32 {
            tlb.insert(page, page + 100);
        }

        assert_eq!(tlb.len(), TLB_ENTRIES);
        for page in 0..TLB_ENTRIES as u32 {
            assert_eq!(tlb.lookup(page), Some(page + 100));
        }
    }

    #[test]
    fn test_fifo_eviction_when_full() {
        let mut tlb = Tlb::new();
        for page in 0..TLB_ENTRIES as u32 {
            tlb.insert(page, page);
        }

        // 17th distinct insert pushes out the oldest entry (page 0) only
        tlb.insert(16, 16);

        assert_eq!(tlb.len(), TLB_ENTRIES);
        assert_eq!(tlb.lookup(0), None);
        for page in 1..=16 {
            assert_eq!(tlb.lookup(page), Some(page));
        }
    }

    #[test]
    fn test_eviction_follows_insertion_order() {
        let mut tlb = Tlb::new();
        for page in 0..TLB_ENTRIES as u32 {
            tlb.insert(page, page);
        }

        tlb.insert(100, 100);
        tlb.insert(101, 101);
        tlb.insert(102, 102);

        // Pages 0, 1, 2 left in the order they arrived
        assert_eq!(tlb.lookup(0), None);
        assert_eq!(tlb.lookup(1), None);
        assert_eq!(tlb.lookup(2), None);
        assert_eq!(tlb.lookup(3), Some(3));
        assert_eq!(tlb.lookup(102), Some(102));
    }

    #[test]
    fn test_hit_does_not_protect_from_eviction() {
        let mut tlb = Tlb::new();
        for page in 0..TLB_ENTRIES as u32 {
            tlb.insert(page, page);
        }

        // Page 0 is looked up (a hit), but FIFO ignores use recency
        assert_eq!(tlb.lookup(0), Some(0));
        tlb.insert(50, 50);

        assert_eq!(tlb.lookup(0), None);
        assert_eq!(tlb.lookup(1), Some(1));
    }
}
