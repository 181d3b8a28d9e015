//! Human-readable dump files over read-only buffer snapshots.
//!
//! Nothing here mutates simulation state; each writer walks a buffer and
//! renders it as a fixed-width table.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::config::MemoryConfig;
use crate::memory::{DiskMemory, PhysicalMemory};
use crate::page_table::ControlBits;

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() { byte as char } else { '.' }
}

/// Write every byte of physical memory as `Address | Frame | Content` rows.
pub fn write_physical_memory<P: AsRef<Path>>(
    memory: &PhysicalMemory,
    config: &MemoryConfig,
    path: P,
) -> io::Result<()> {
    info!("writing physical memory dump: {}", path.as_ref().display());
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{:<16}| {:<15}| {:<16}", "Address", "Frame", "Content")?;
    writeln!(out, "{}|{}|{}", "-".repeat(16), "-".repeat(15), "-".repeat(16))?;
    for (address, &byte) in memory.as_bytes().iter().enumerate() {
        writeln!(
            out,
            "{:#06X}\t\t| {:#04X}\t\t| {}",
            address,
            config.address_to_frame(address),
            printable(byte)
        )?;
    }
    out.flush()
}

/// Write one row per page table entry with its decoded control bits.
pub fn write_page_table<P: AsRef<Path>>(memory: &PhysicalMemory, path: P) -> io::Result<()> {
    info!("writing page table dump: {}", path.as_ref().display());
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(
        out,
        "{:<8}| {:<23}| {:<15}| {:<15}| {:<15}| {:<9}",
        "Page", "Physical Frame", "Is Present?", "Can RW?", "Is Dirty?", "On Disk?"
    )?;
    writeln!(
        out,
        "{}|{}|{}|{}|{}|{}",
        "-".repeat(8),
        "-".repeat(23),
        "-".repeat(15),
        "-".repeat(15),
        "-".repeat(15),
        "-".repeat(9)
    )?;
    for page in 0..memory.entry_count() {
        let entry = memory.read_entry(page);
        writeln!(
            out,
            "{:<8}| {:#04X}\t\t\t| {:<15}| {:<15}| {:<15}| {:<9}",
            page,
            entry.frame_number,
            entry.control_bits.contains(ControlBits::PRESENT) as u8,
            entry.control_bits.contains(ControlBits::READWRITE) as u8,
            entry.control_bits.contains(ControlBits::DIRTY) as u8,
            entry.control_bits.contains(ControlBits::DISK) as u8,
        )?;
    }
    out.flush()
}

/// Write every byte of the disk buffer as `Block | Content` rows.
pub fn write_disk_memory<P: AsRef<Path>>(
    disk: &DiskMemory,
    config: &MemoryConfig,
    path: P,
) -> io::Result<()> {
    info!("writing disk memory dump: {}", path.as_ref().display());
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{:<16}| {:<16}", "Block", "Content")?;
    writeln!(out, "{}|{}", "-".repeat(16), "-".repeat(16))?;
    for (address, &byte) in disk.as_bytes().iter().enumerate() {
        writeln!(
            out,
            "{:#04X}\t\t| {}",
            address / config.page_size,
            printable(byte)
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::PageTableEntry;
    use std::fs;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mmu-sim-report-{}-{}", std::process::id(), name))
    }

    #[test]
    fn page_table_dump_lists_every_entry() {
        let config = MemoryConfig::default();
        let mut memory = PhysicalMemory::new(&config);
        memory.write_entry(
            0,
            PageTableEntry::new(3, ControlBits::PRESENT | ControlBits::READWRITE),
        );
        memory.write_entry(1, PageTableEntry::new(0, ControlBits::READWRITE | ControlBits::DISK));

        let path = tmp_path("page-table.txt");
        write_page_table(&memory, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        // header + separator + one row per entry
        assert_eq!(text.lines().count(), 2 + config.entry_count());
        assert!(text.contains("Is Present?"));
        assert!(text.lines().nth(2).unwrap().contains("0x03"));
    }

    #[test]
    fn physical_dump_covers_the_whole_buffer() {
        let config = MemoryConfig::default();
        let mut memory = PhysicalMemory::new(&config);
        memory.write(100, b'A');

        let path = tmp_path("physical.txt");
        write_physical_memory(&memory, &config, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(text.lines().count(), 2 + config.physical_memory_size);
        assert!(text.contains("| A"));
    }

    #[test]
    fn disk_dump_groups_bytes_by_block() {
        let config = MemoryConfig::default();
        let mut disk = DiskMemory::new(&config);
        disk.write_block(0, &vec![b'x'; config.page_table_size]);

        let path = tmp_path("disk.txt");
        write_disk_memory(&disk, &config, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(text.lines().count(), 2 + config.disk_memory_size);
        assert!(text.lines().nth(2).unwrap().starts_with("0x00"));
    }
}
