//! MMU simulator entry point.
//!
//! Runs one simulation: writes a pseudo-random payload into physical
//! memory (filling page table entries and spilling trailing frames to the
//! simulated disk), exports the memory dumps, then translates any virtual
//! addresses given on the command line.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mmu_sim::{report, MemoryConfig, MemorySimulator, VirtualAddress};

#[derive(Parser)]
#[command(name = "mmu-sim", version, about = "Simulated memory management unit")]
struct Cli {
    /// Seed for the random generator (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Payload size in bytes (random within the configured bounds when omitted)
    #[arg(long)]
    payload_size: Option<usize>,

    /// Physical start address of the payload (a random frame when omitted)
    #[arg(long)]
    start_address: Option<usize>,

    /// Directory receiving the dump files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip writing the dump files
    #[arg(long)]
    no_reports: bool,

    /// 16-bit virtual addresses to translate (decimal or 0x-prefixed)
    #[arg(value_parser = parse_address)]
    addresses: Vec<u16>,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("invalid 16-bit virtual address: {text}"))
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = MemoryConfig::default();
    let mut sim = match cli.seed {
        Some(seed) => MemorySimulator::with_seed(config, seed),
        None => MemorySimulator::new(config),
    };

    let payload_size = cli
        .payload_size
        .unwrap_or_else(|| sim.random_payload_size());
    let start_address = match cli.start_address {
        Some(address) => address,
        None => {
            // The random frame range can dip below zero; land those picks
            // on frame 0 rather than refusing the run.
            let frame = sim.pick_random_frame().max(0) as usize;
            sim.config().frame_to_address(frame)
        }
    };

    let summary = sim
        .write_payload(payload_size, start_address)
        .context("payload write failed")?;
    println!("{summary}");

    if !cli.no_reports {
        fs::create_dir_all(&cli.output_dir)
            .with_context(|| format!("creating {}", cli.output_dir.display()))?;
        let resolved = cli
            .output_dir
            .canonicalize()
            .unwrap_or_else(|_| cli.output_dir.clone());
        report::write_physical_memory(
            sim.memory(),
            sim.config(),
            cli.output_dir.join("physical_memory.txt"),
        )?;
        report::write_page_table(sim.memory(), cli.output_dir.join("page_table.txt"))?;
        report::write_disk_memory(
            sim.disk(),
            sim.config(),
            cli.output_dir.join("disk_memory.txt"),
        )?;
        info!("reports written to {}", resolved.display());
    }

    for raw in cli.addresses {
        let va = VirtualAddress::from_raw(raw, sim.config());
        let translation = sim
            .translate(va)
            .with_context(|| format!("translating {va}"))?;
        println!("{translation}");

        let address = translation.physical_address as usize;
        match sim.read_byte(address) {
            Some(byte) if byte != 0 => {
                println!("[Content @ {:#06X}]:\t\t{}", address, byte as char)
            }
            _ => println!("[Content @ {:#06X}]:\t\tN/A", address),
        }
    }

    Ok(())
}
