use std::fmt;

use log::debug;

use crate::config::MemoryConfig;
use crate::error::SimError;
use crate::memory::PhysicalMemory;
use crate::page_table::ControlBits;

/// Decomposed 16-bit virtual address: high bits select the page, low bits
/// the in-page offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub raw: u16,
    pub page: u16,
    pub offset: u16,
}

impl VirtualAddress {
    pub fn from_raw(raw: u16, config: &MemoryConfig) -> Self {
        VirtualAddress {
            raw,
            page: raw >> config.bit_shift_by,
            offset: raw & config.offset_mask,
        }
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA({:#06X}) = (page={:#04X}, offset={:#04X})",
            self.raw, self.page, self.offset
        )
    }
}

/// Full record of one address translation, including every intermediate
/// value, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub input: VirtualAddress,
    /// Byte offset of the consulted entry (`page * 2`).
    pub entry_index: usize,
    pub frame_number: u8,
    pub control_bits: ControlBits,
    /// `(frame_number & offset_mask) << 8`.
    pub shifted_frame: u16,
    pub physical_address: u16,
    /// Entry claimed by the disk-fault path, when the consulted entry was
    /// marked DISK. The claim has no effect on the returned address; the
    /// modeled system never completes the swap-in.
    pub reclaimed_entry: Option<usize>,
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[User Input]:\t\t\t{:#06X}", self.input.raw)?;
        writeln!(f, "[Page Number]:\t\t\t{:#06X}", self.input.page)?;
        writeln!(f, "[Entry Index]:\t\t\t{:#06X}", self.entry_index)?;
        writeln!(f, "[Control Bits]:\t\t\t{:#06X}", self.control_bits.bits())?;
        writeln!(f, "[Physical Frame Number]:\t{:#06X}", self.shifted_frame)?;
        writeln!(f, "[Page Offset]:\t\t\t{:#06X}", self.input.offset)?;
        write!(f, "[Frame Number & Offset]:\t{:#06X}", self.physical_address)?;
        if let Some(entry) = self.reclaimed_entry {
            write!(f, "\n[Reclaimed Entry]:\t\t{:#06X}", entry)?;
        }
        Ok(())
    }
}

/// Translate a virtual page number and offset into a physical address via
/// the page table.
///
/// The entry is read raw at byte offset `page * 2`, so a page number past
/// the table region resolves against whatever frame data happens to live
/// there, exactly as the modeled hardware would. Only an index past the end
/// of physical memory itself is an error.
///
/// A DISK-flagged entry triggers the fault path: a free entry is claimed
/// via [`PhysicalMemory::find_free_entry`] (setting its PRESENT bit) and
/// reported, but neither the faulting entry nor the returned address is
/// updated — the simulation stops short of the actual swap-in.
pub fn translate(
    memory: &mut PhysicalMemory,
    config: &MemoryConfig,
    va: VirtualAddress,
) -> Result<Translation, SimError> {
    let entry_index = va.page as usize * 2;
    let out_of_range = |address| SimError::AddressOutOfRange {
        address,
        limit: memory.len(),
    };
    let frame_number = memory.read(entry_index).ok_or_else(|| out_of_range(entry_index))?;
    let control = memory
        .read(entry_index + 1)
        .ok_or_else(|| out_of_range(entry_index + 1))?;
    let control_bits = ControlBits::from_bits_retain(control);

    let shifted_frame = (u16::from(frame_number) & config.offset_mask) << 8;
    let physical_address = shifted_frame | va.offset;

    let reclaimed_entry = if control_bits.contains(ControlBits::DISK) {
        debug!("disk fault on page {:#04X}, claiming a free entry", va.page);
        memory.find_free_entry()
    } else {
        None
    };

    Ok(Translation {
        input: va,
        entry_index,
        frame_number,
        control_bits,
        shifted_frame,
        physical_address,
        reclaimed_entry,
    })
}
