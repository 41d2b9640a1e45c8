use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::constants::*;
use crate::error::VmError;

/// Simulated physical memory: a fixed array of 256-byte frames.
pub struct PhysicalMemory {
    frames: Box<[[u8; PAGE_SIZE]; NUM_FRAMES]>,
}

impl PhysicalMemory {
    /// Create a new physical memory initialized to all zeros
    pub fn new() -> Self {
        // Allocate through a Vec; the full array is too large for the stack.
        let frames = vec![[0u8; PAGE_SIZE]; NUM_FRAMES].into_boxed_slice();
        let frames: Box<[[u8; PAGE_SIZE]; NUM_FRAMES]> = frames.try_into().unwrap();
        PhysicalMemory { frames }
    }

    /// Read one byte out of a frame
    #[inline]
    pub fn read(&self, frame: u32, offset: u32) -> u8 {
        self.frames[frame as usize][offset as usize]
    }

    /// Overwrite an entire frame with a freshly loaded page image
    pub fn load_frame(&mut self, frame: u32, data: &[u8; PAGE_SIZE]) {
        self.frames[frame as usize].copy_from_slice(data);
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only source of page images, consulted only on a page fault.
///
/// Page `p` occupies bytes `[256p, 256p + 256)` of the underlying file. The
/// store is assumed complete: a seek past the end or a partial page is fatal.
#[derive(Debug)]
pub struct BackingStore {
    file: File,
}

impl BackingStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VmError> {
        let file = File::open(path.as_ref()).map_err(|source| VmError::BackingStore { source })?;
        Ok(BackingStore { file })
    }

    /// Read the 256-byte image of `page`.
    pub fn load(&mut self, page: u32) -> Result<[u8; PAGE_SIZE], VmError> {
        self.file
            .seek(SeekFrom::Start(page as u64 * PAGE_SIZE as u64))
            .map_err(|source| VmError::BackingStore { source })?;

        let mut buf = [0u8; PAGE_SIZE];
        self.file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                VmError::ShortRead { page }
            } else {
                VmError::BackingStore { source: e }
            }
        })?;
        Ok(buf)
    }
}

/// Page table with demand loading.
///
/// Entries start unmapped and are written exactly once, at first fault, with
/// the next never-used frame. Nothing is ever unmapped again; the free-frame
/// counter only moves forward.
pub struct PageTable {
    entries: [Option<u32>; NUM_PAGES],
    next_free: usize,
}

impl PageTable {
    pub fn new() -> Self {
        PageTable {
            entries: [None; NUM_PAGES],
            next_free: 0,
        }
    }

    /// Frame currently holding `page`, if resident.
    #[inline]
    pub fn frame_of(&self, page: u32) -> Option<u32> {
        self.entries[page as usize]
    }

    /// Number of pages faulted in so far (equals the number of frames used).
    pub fn resident_pages(&self) -> usize {
        self.next_free
    }

    /// Resolve `page` to a frame, paging it in from the backing store on a
    /// fault. Returns the frame and whether a fault occurred.
    pub fn resolve(
        &mut self,
        page: u32,
        backing: &mut BackingStore,
        memory: &mut PhysicalMemory,
    ) -> Result<(u32, bool), VmError> {
        if let Some(frame) = self.entries[page as usize] {
            return Ok((frame, false));
        }

        if self.next_free >= NUM_FRAMES {
            // Wrapping the counter would hand the same frame to two pages.
            return Err(VmError::FrameCapacityExhausted);
        }

        let frame = self.next_free as u32;
        let data = backing.load(page)?;
        memory.load_frame(frame, &data);
        self.entries[page as usize] = Some(frame);
        self.next_free += 1;

        debug!("page fault: page {} -> frame {}", page, frame);
        Ok((frame, true))
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}
