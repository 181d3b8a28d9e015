use log::warn;

use crate::config::MemoryConfig;
use crate::page_table::{ControlBits, PageTableEntry};

/// Simulated physical memory.
///
/// One flat byte buffer: bytes `[0, page_table_size)` hold the page table,
/// the rest is frame data in `page_size` chunks. Keeping both regions in a
/// single arena preserves the address arithmetic of the hardware being
/// modeled (frame 0 overlaps the table).
pub struct PhysicalMemory {
    data: Box<[u8]>,
    page_table_size: usize,
}

impl PhysicalMemory {
    /// Create physical memory initialized to all zeros: every entry empty,
    /// every frame byte zero.
    pub fn new(config: &MemoryConfig) -> Self {
        PhysicalMemory {
            data: vec![0u8; config.physical_memory_size].into_boxed_slice(),
            page_table_size: config.page_table_size,
        }
    }

    /// Read a byte. Translated addresses can exceed the buffer (the frame
    /// number comes from whatever the entry holds), so an out-of-range read
    /// is `None` rather than a panic.
    #[inline]
    pub fn read(&self, address: usize) -> Option<u8> {
        self.data.get(address).copied()
    }

    /// Write a byte. Callers validate the address range first.
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        self.data[address] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of page table entries this memory holds.
    pub fn entry_count(&self) -> usize {
        self.page_table_size / 2
    }

    /// Read the page table entry at `index`.
    ///
    /// # Panics
    /// If `index` is outside the page table region.
    pub fn read_entry(&self, index: usize) -> PageTableEntry {
        assert!(index < self.entry_count(), "page table index {index} out of range");
        let base = index * 2;
        PageTableEntry::from_bytes(self.data[base], self.data[base + 1])
    }

    /// Store a 2-byte entry at `index * 2`.
    ///
    /// # Panics
    /// If the write would land past the page table region. That is a
    /// precondition violation, not a recoverable condition.
    pub fn write_entry(&mut self, index: usize, entry: PageTableEntry) {
        assert!(index < self.entry_count(), "page table index {index} out of range");
        let base = index * 2;
        let [frame, bits] = entry.to_bytes();
        self.data[base] = frame;
        self.data[base + 1] = bits;
    }

    /// Scan the table in index order for the first entry whose PRESENT bit
    /// is clear, mark it PRESENT, and return its index. `None` means every
    /// entry is occupied; callers must treat that as allocation failure.
    pub fn find_free_entry(&mut self) -> Option<usize> {
        for index in 0..self.entry_count() {
            let bits = self.data[index * 2 + 1];
            if bits & ControlBits::PRESENT.bits() == 0 {
                self.data[index * 2 + 1] = bits | ControlBits::PRESENT.bits();
                return Some(index);
            }
        }
        warn!("page table exhausted, no free entry");
        None
    }

    /// Zero the whole buffer (table and frame data alike).
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Read-only view of the raw buffer, for the reporting layer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Simulated swap disk: a flat byte buffer addressed by disk block index,
/// independent of physical memory addressing.
pub struct DiskMemory {
    data: Box<[u8]>,
}

impl DiskMemory {
    /// Create a zeroed disk buffer.
    pub fn new(config: &MemoryConfig) -> Self {
        DiskMemory {
            data: vec![0u8; config.disk_memory_size].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read(&self, address: usize) -> Option<u8> {
        self.data.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy `bytes` into the disk at `block_index * bytes.len()`.
    ///
    /// # Panics
    /// If the block would run past the end of the disk buffer.
    pub fn write_block(&mut self, block_index: usize, bytes: &[u8]) {
        let start = block_index * bytes.len();
        let end = start + bytes.len();
        assert!(end <= self.data.len(), "disk block {block_index} out of range");
        self.data[start..end].copy_from_slice(bytes);
    }

    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> PhysicalMemory {
        PhysicalMemory::new(&MemoryConfig::default())
    }

    #[test]
    fn memory_starts_zeroed() {
        let pm = memory();
        assert_eq!(pm.read(0), Some(0));
        assert_eq!(pm.read(pm.len() - 1), Some(0));
        assert_eq!(pm.read(pm.len()), None);
    }

    #[test]
    fn entry_write_then_read_returns_same_pair() {
        let mut pm = memory();
        for index in 0..pm.entry_count() {
            let entry = PageTableEntry::new(index as u8, ControlBits::PRESENT | ControlBits::DIRTY);
            pm.write_entry(index, entry);
            assert_eq!(pm.read_entry(index), entry);
        }
        // Raw layout: entry 3 lives at bytes 6 and 7
        assert_eq!(pm.read(6), Some(3));
        assert_eq!(pm.read(7), Some(0x05));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn entry_write_past_table_is_fatal() {
        let mut pm = memory();
        let count = pm.entry_count();
        pm.write_entry(count, PageTableEntry::default());
    }

    #[test]
    fn find_free_entry_skips_present_and_marks_result() {
        let mut pm = memory();
        pm.write_entry(0, PageTableEntry::new(5, ControlBits::PRESENT));
        pm.write_entry(1, PageTableEntry::new(6, ControlBits::READWRITE | ControlBits::DISK));

        // Entry 1 has PRESENT clear even though other bits are set
        let found = pm.find_free_entry();
        assert_eq!(found, Some(1));
        assert!(pm.read_entry(1).is_present());
        // The other bits survive the claim
        assert!(pm.read_entry(1).is_on_disk());

        // Next scan moves past it
        assert_eq!(pm.find_free_entry(), Some(2));
    }

    #[test]
    fn find_free_entry_reports_exhaustion() {
        let mut pm = memory();
        for index in 0..pm.entry_count() {
            pm.write_entry(index, PageTableEntry::new(0, ControlBits::PRESENT));
        }
        assert_eq!(pm.find_free_entry(), None);
    }

    #[test]
    fn reset_restores_zero_state() {
        let mut pm = memory();
        pm.write(100, 0x41);
        pm.write_entry(2, PageTableEntry::new(9, ControlBits::PRESENT));
        pm.reset();
        assert_eq!(pm.read(100), Some(0));
        assert_eq!(pm.read_entry(2), PageTableEntry::default());
    }

    #[test]
    fn disk_block_placement() {
        let cfg = MemoryConfig::default();
        let mut disk = DiskMemory::new(&cfg);
        let block = vec![0xAA; cfg.page_table_size];
        disk.write_block(2, &block);

        let start = 2 * cfg.page_table_size;
        assert_eq!(disk.read(start - 1), Some(0));
        assert_eq!(disk.read(start), Some(0xAA));
        assert_eq!(disk.read(start + cfg.page_table_size - 1), Some(0xAA));
        assert_eq!(disk.read(start + cfg.page_table_size), Some(0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn disk_block_past_end_is_fatal() {
        let cfg = MemoryConfig::default();
        let mut disk = DiskMemory::new(&cfg);
        let blocks = cfg.disk_memory_size / cfg.page_table_size;
        disk.write_block(blocks, &vec![0u8; cfg.page_table_size]);
    }
}
