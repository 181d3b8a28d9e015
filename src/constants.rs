//! Default constants of the standard simulation profile.
//!
//! Every value here is consumed through [`crate::config::MemoryConfig`];
//! nothing in the core reads these directly, so alternate profiles can be
//! built in tests without touching process-wide state.

/// Total bytes of simulated physical memory.
pub const PHYSICAL_MEMORY_SIZE: usize = 4096;

/// Bytes at the bottom of physical memory reserved for the page table.
/// Must be even: entries are 2 bytes each.
pub const PAGE_TABLE_SIZE: usize = 32;

/// Bytes per frame (and per page).
pub const PAGE_SIZE: usize = 256;

/// Frames addressable by the payload writer. Deliberately smaller than
/// `PHYSICAL_MEMORY_SIZE / PAGE_SIZE` to leave headroom for the page table.
pub const FRAME_COUNT: usize = 14;

/// Total bytes of the simulated swap disk.
pub const DISK_MEMORY_SIZE: usize = 1024;

/// Mask selecting the in-page offset of a 16-bit virtual address.
pub const OFFSET_MASK: u16 = 0x00FF;

/// Right shift selecting the page number of a 16-bit virtual address.
pub const BIT_SHIFT_BY: u32 = 8;

/// Extra frames subtracted when an overflowing payload is shifted backward,
/// so the shifted end frame lands strictly below `FRAME_COUNT`.
pub const OOR_FRAME_OFFSET: usize = 1;

/// Bounds (inclusive) for randomly generated payload sizes, in bytes.
pub const PAYLOAD_LOWER_BOUNDS: usize = 1024;
pub const PAYLOAD_UPPER_BOUNDS: usize = 2048;

/// Inclusive range of the printable ASCII bytes used as payload content.
pub const ASCII_MIN_RANGE: u8 = 33;
pub const ASCII_MAX_RANGE: u8 = 126;
