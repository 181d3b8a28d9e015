use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Control bits of a page table entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlBits: u8 {
        /// Entry maps a frame that is resident in physical memory.
        const PRESENT = 0x01;
        /// Frame may be written as well as read.
        const READWRITE = 0x02;
        /// Frame was modified since it was loaded.
        const DIRTY = 0x04;
        /// Frame lives on the simulated disk, not in physical memory.
        const DISK = 0x08;
    }
}

impl fmt::Display for ControlBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={} RW={} D={} DSK={}",
            self.contains(ControlBits::PRESENT) as u8,
            self.contains(ControlBits::READWRITE) as u8,
            self.contains(ControlBits::DIRTY) as u8,
            self.contains(ControlBits::DISK) as u8,
        )
    }
}

/// One 2-byte page table entry: `[frame_number, control_bits]`.
///
/// Entry `i` lives at byte offset `i * 2` of physical memory. An entry only
/// ever moves from empty to `PRESENT|READWRITE` (resident frame) or to
/// `READWRITE|DISK` (spilled frame); nothing frees an entry or swaps a disk
/// frame back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageTableEntry {
    pub frame_number: u8,
    pub control_bits: ControlBits,
}

impl PageTableEntry {
    pub fn new(frame_number: u8, control_bits: ControlBits) -> Self {
        PageTableEntry { frame_number, control_bits }
    }

    /// Decode from the raw 2-byte layout. Unknown flag bits are kept as-is
    /// so a raw dump of the buffer matches what was stored.
    pub fn from_bytes(frame_number: u8, control_bits: u8) -> Self {
        PageTableEntry {
            frame_number,
            control_bits: ControlBits::from_bits_retain(control_bits),
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.frame_number, self.control_bits.bits()]
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.control_bits.contains(ControlBits::PRESENT)
    }

    #[inline]
    pub fn is_on_disk(&self) -> bool {
        self.control_bits.contains(ControlBits::DISK)
    }
}
