use std::fmt;

use crate::constants::*;
use crate::error::VmError;
use crate::memory::{BackingStore, PageTable, PhysicalMemory};
use crate::tlb::Tlb;

/// Represents the decomposed components of a virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub raw: u32,
    pub page: u32,
    pub offset: u32,
}

impl VirtualAddress {
    /// Split a raw address into page number and offset.
    ///
    /// Only the low 16 bits carry meaning; anything above the page:offset
    /// window is masked off, not rejected.
    pub fn from_raw(raw: u32) -> Self {
        let page = (raw >> PAGE_SHIFT) & PAGE_MASK;
        let offset = raw & OFFSET_MASK;

        VirtualAddress { raw, page, offset }
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA({}) = (page={}, offset={})",
            self.raw, self.page, self.offset
        )
    }
}

/// Outcome of translating one virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub virtual_addr: u32,
    pub physical_addr: u32,
    pub value: i8,
    pub tlb_hit: bool,
    pub page_fault: bool,
}

/// Run counters, read once for the end-of-run report.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub translated: u64,
    pub page_faults: u64,
    pub tlb_hits: u64,
}

impl Stats {
    pub fn fault_rate(&self) -> f64 {
        if self.translated == 0 {
            0.0
        } else {
            self.page_faults as f64 / self.translated as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.translated == 0 {
            0.0
        } else {
            self.tlb_hits as f64 / self.translated as f64
        }
    }
}

/// Owns the full translation pipeline for one simulation run: physical
/// memory, page table, TLB, the backing store handle, and the counters.
///
/// One address is translated to completion before the next begins; nothing
/// here is shared, so independent runs compose safely side by side.
pub struct Translator {
    memory: PhysicalMemory,
    page_table: PageTable,
    tlb: Tlb,
    backing: BackingStore,
    stats: Stats,
}

impl Translator {
    pub fn new(backing: BackingStore) -> Self {
        Translator {
            memory: PhysicalMemory::new(),
            page_table: PageTable::new(),
            tlb: Tlb::new(),
            backing,
            stats: Stats::default(),
        }
    }

    /// Translate one raw virtual address to a physical address and the byte
    /// stored there.
    ///
    /// The TLB is consulted first; on a miss the page table resolves the
    /// page (faulting it in from the backing store if unmapped) and the TLB
    /// is refreshed with the resolved mapping. A hit leaves the TLB as it is.
    pub fn translate(&mut self, raw: u32) -> Result<Translation, VmError> {
        let va = VirtualAddress::from_raw(raw);

        let (frame, tlb_hit, page_fault) = match self.tlb.lookup(va.page) {
            Some(frame) => (frame, true, false),
            None => {
                let (frame, faulted) =
                    self.page_table
                        .resolve(va.page, &mut self.backing, &mut self.memory)?;
                self.tlb.insert(va.page, frame);
                (frame, false, faulted)
            }
        };

        self.stats.translated += 1;
        if tlb_hit {
            self.stats.tlb_hits += 1;
        }
        if page_fault {
            self.stats.page_faults += 1;
        }

        Ok(Translation {
            virtual_addr: raw,
            physical_addr: frame * PAGE_SIZE as u32 + va.offset,
            value: self.memory.read(frame, va.offset) as i8,
            tlb_hit,
            page_fault,
        })
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }
}
