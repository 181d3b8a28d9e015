use crate::constants::*;

/// Fixed configuration of one simulation run.
///
/// The values are read-only once the simulator is built; the core never
/// parses or mutates them. `Default` yields the standard profile from
/// [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    pub physical_memory_size: usize,
    pub page_table_size: usize,
    pub page_size: usize,
    pub frame_count: usize,
    pub disk_memory_size: usize,
    pub offset_mask: u16,
    pub bit_shift_by: u32,
    pub oor_frame_offset: usize,
    pub payload_lower_bounds: usize,
    pub payload_upper_bounds: usize,
    pub ascii_min_range: u8,
    pub ascii_max_range: u8,
}

impl MemoryConfig {
    /// Number of page table entries (2 bytes each).
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.page_table_size / 2
    }

    /// Frames available to payload writes once the page table region is
    /// taken out. Saturates at zero rather than underflowing if the table
    /// is configured larger than memory itself.
    #[inline]
    pub fn available_frame_count(&self) -> usize {
        self.physical_memory_size.saturating_sub(self.page_table_size) / self.page_size
    }

    /// Starting physical address of a frame.
    #[inline]
    pub fn frame_to_address(&self, frame: usize) -> usize {
        frame * self.page_size
    }

    /// Frame containing a physical address.
    #[inline]
    pub fn address_to_frame(&self, address: usize) -> usize {
        address / self.page_size
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            physical_memory_size: PHYSICAL_MEMORY_SIZE,
            page_table_size: PAGE_TABLE_SIZE,
            page_size: PAGE_SIZE,
            frame_count: FRAME_COUNT,
            disk_memory_size: DISK_MEMORY_SIZE,
            offset_mask: OFFSET_MASK,
            bit_shift_by: BIT_SHIFT_BY,
            oor_frame_offset: OOR_FRAME_OFFSET,
            payload_lower_bounds: PAYLOAD_LOWER_BOUNDS,
            payload_upper_bounds: PAYLOAD_UPPER_BOUNDS,
            ascii_min_range: ASCII_MIN_RANGE,
            ascii_max_range: ASCII_MAX_RANGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile_derived_values() {
        let cfg = MemoryConfig::default();
        assert_eq!(cfg.entry_count(), 16);
        // (4096 - 32) / 256 = 15, independent of the configured frame count
        assert_eq!(cfg.available_frame_count(), 15);
    }

    #[test]
    fn frame_address_conversions_round_trip() {
        let cfg = MemoryConfig::default();
        for frame in 0..cfg.frame_count {
            assert_eq!(cfg.address_to_frame(cfg.frame_to_address(frame)), frame);
        }
        assert_eq!(cfg.frame_to_address(1), 256);
        assert_eq!(cfg.address_to_frame(511), 1);
    }

    #[test]
    fn available_frame_count_saturates() {
        let cfg = MemoryConfig {
            page_table_size: 8192,
            ..MemoryConfig::default()
        };
        assert_eq!(cfg.available_frame_count(), 0);
    }

    #[test]
    fn available_frame_count_is_idempotent() {
        let cfg = MemoryConfig::default();
        assert_eq!(cfg.available_frame_count(), cfg.available_frame_count());
    }
}
