use std::fmt;

use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::MemoryConfig;
use crate::error::SimError;
use crate::memory::{DiskMemory, PhysicalMemory};
use crate::page_table::{ControlBits, PageTableEntry};
use crate::translation::{self, Translation, VirtualAddress};

/// Summary of one payload write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Frame containing the (possibly shifted) start address.
    pub start_frame: usize,
    /// Start address actually written to, after any overflow shift.
    pub effective_start: usize,
    /// Requested payload size in bytes.
    pub payload_bytes: usize,
    /// Frames the payload spans.
    pub frames_occupied: usize,
    /// Trailing frames spilled to the disk buffer during this write.
    pub disk_blocks: usize,
}

impl fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "starting frame {:#04X}, wrote {} bytes, {} frames occupied ({} spilled to disk)",
            self.start_frame, self.payload_bytes, self.frames_occupied, self.disk_blocks
        )
    }
}

/// Owning context of one simulation run.
///
/// Holds both buffers, the RNG, and the three write cursors that track
/// progress across successive payload writes. Keeping the cursors here
/// (rather than as process-wide state) lets independent simulations run
/// side by side and be reset deterministically between test cases.
pub struct MemorySimulator {
    config: MemoryConfig,
    memory: PhysicalMemory,
    disk: DiskMemory,
    rng: SmallRng,
    /// Next page table entry to be filled, in entry units.
    table_cursor: usize,
    /// Frame boundaries crossed by payload writes so far.
    frame_cursor: usize,
    /// Next disk block to receive a spilled frame.
    disk_cursor: usize,
}

impl MemorySimulator {
    /// Build a simulator with an OS-seeded RNG.
    pub fn new(config: MemoryConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Build a simulator with a fixed seed, for reproducible runs.
    pub fn with_seed(config: MemoryConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: MemoryConfig, rng: SmallRng) -> Self {
        let memory = PhysicalMemory::new(&config);
        let disk = DiskMemory::new(&config);
        info!(
            "initialized {} bytes of physical memory ({} page table entries) and {} bytes of disk",
            config.physical_memory_size,
            config.entry_count(),
            config.disk_memory_size
        );
        MemorySimulator {
            config,
            memory,
            disk,
            rng,
            table_cursor: 0,
            frame_cursor: 0,
            disk_cursor: 0,
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Read-only snapshot of physical memory, for reporting.
    pub fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    /// Read-only snapshot of the disk buffer, for reporting.
    pub fn disk(&self) -> &DiskMemory {
        &self.disk
    }

    /// Byte at a physical address, `None` when out of range.
    pub fn read_byte(&self, address: usize) -> Option<u8> {
        self.memory.read(address)
    }

    /// Zero both buffers and all cursors. The RNG stream is left alone so a
    /// seeded run stays reproducible across resets.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.disk.reset();
        self.table_cursor = 0;
        self.frame_cursor = 0;
        self.disk_cursor = 0;
        info!("simulation state reset");
    }

    /// Random payload size within the configured bounds, or 0 when the
    /// bounds coincide.
    pub fn random_payload_size(&mut self) -> usize {
        if self.config.payload_lower_bounds == self.config.payload_upper_bounds {
            return 0;
        }
        self.rng
            .random_range(self.config.payload_lower_bounds..=self.config.payload_upper_bounds)
    }

    /// Uniformly random frame index in
    /// `[frame_count - available_frame_count(), frame_count]`.
    ///
    /// The inclusive upper bound (and the lower bound dipping below zero
    /// whenever more frames are available than `frame_count` admits) is a
    /// known quirk of the modeled system, kept deliberately.
    pub fn pick_random_frame(&mut self) -> i32 {
        let min = self.config.frame_count as i32 - self.config.available_frame_count() as i32;
        let max = self.config.frame_count as i32;
        self.rng.random_range(min..=max)
    }

    fn random_payload_byte(&mut self) -> u8 {
        self.rng
            .random_range(self.config.ascii_min_range..=self.config.ascii_max_range)
    }

    /// Append a page table entry at the table cursor and advance it.
    fn push_entry(&mut self, frame_number: u8, control_bits: ControlBits) {
        self.memory
            .write_entry(self.table_cursor, PageTableEntry::new(frame_number, control_bits));
        self.table_cursor += 1;
    }

    /// Randomize one disk block (`page_table_size` bytes, as the modeled
    /// system does) at the disk cursor and advance it.
    fn spill_to_disk(&mut self) {
        debug!("spilling frame to disk block {}", self.disk_cursor);
        let block: Vec<u8> = (0..self.config.page_table_size)
            .map(|_| self.random_payload_byte())
            .collect();
        self.disk.write_block(self.disk_cursor, &block);
        self.disk_cursor += 1;
    }

    /// Write a pseudo-random byte payload into physical memory starting at
    /// `start_address`, filling page table entries at every frame boundary
    /// and spilling the trailing two frames of the payload to disk.
    ///
    /// When the payload would run past the frame space, the start address
    /// is shifted backward just far enough for it to fit; a shift that
    /// leaves no valid start address is an [`SimError::AddressOverflow`].
    pub fn write_payload(
        &mut self,
        payload_size: usize,
        start_address: usize,
    ) -> Result<WriteSummary, SimError> {
        if start_address >= self.config.physical_memory_size {
            error!(
                "cannot write payload: start address {:#06X} past physical memory",
                start_address
            );
            return Err(SimError::AddressOutOfRange {
                address: start_address,
                limit: self.config.physical_memory_size,
            });
        }

        let page_size = self.config.page_size;
        let start_frame = start_address / page_size;
        let payload_frames = payload_size / page_size;
        let end_frame = start_frame + payload_frames;

        let mut effective_start = start_address;
        if end_frame >= self.config.frame_count {
            let overflow_frames = end_frame - self.config.frame_count;
            let shift_frames = overflow_frames + self.config.oor_frame_offset;
            let shift = shift_frames * page_size;
            debug!(
                "payload out of bounds: start frame {:#04X}, {} payload frames, end frame {:#04X}, overflow {} frames",
                start_frame, payload_frames, end_frame, overflow_frames
            );
            effective_start = start_address
                .checked_sub(shift)
                .ok_or(SimError::AddressOverflow { start_address, shift })?;
            info!("shifting payload start back by {} frame(s)", shift_frames);
        }

        info!(
            "writing {} byte payload at {:#06X}",
            payload_size, effective_start
        );

        let end = effective_start + payload_size;
        debug_assert!(end <= self.config.physical_memory_size);

        let mut disk_blocks = 0;
        let mut address = effective_start;
        while address < end {
            if address % page_size == 0 {
                let current_frame = address / page_size;
                // Interior frames stay resident; the trailing two frames of
                // the payload go to disk, keyed by the disk cursor.
                if (self.frame_cursor as i64) < payload_frames as i64 - 2 {
                    self.push_entry(
                        current_frame as u8,
                        ControlBits::PRESENT | ControlBits::READWRITE,
                    );
                } else {
                    self.push_entry(
                        self.disk_cursor as u8,
                        ControlBits::READWRITE | ControlBits::DISK,
                    );
                    self.spill_to_disk();
                    self.frame_cursor += 1;
                    disk_blocks += 1;
                    // A disk-resident frame's bytes never land in physical
                    // memory; jump to the next boundary.
                    address += page_size;
                    continue;
                }
                self.frame_cursor += 1;
            }
            let byte = self.random_payload_byte();
            self.memory.write(address, byte);
            address += 1;
        }

        let summary = WriteSummary {
            start_frame: effective_start / page_size,
            effective_start,
            payload_bytes: payload_size,
            frames_occupied: payload_frames,
            disk_blocks,
        };
        info!("{}", summary);
        Ok(summary)
    }

    /// Translate a virtual address through the page table. See
    /// [`translation::translate`] for the fault semantics.
    pub fn translate(&mut self, va: VirtualAddress) -> Result<Translation, SimError> {
        translation::translate(&mut self.memory, &self.config, va)
    }
}
