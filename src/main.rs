//! Demand-paged virtual memory simulator.
//!
//! Translates a stream of virtual addresses to physical addresses through a
//! TLB and a demand-loading page table, printing each translation and the
//! run's fault/hit statistics.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{LevelFilter, info};

use vmsim::error::VmError;
use vmsim::io::{Reference, read_virtual_addresses};
use vmsim::memory::BackingStore;
use vmsim::translation::Translator;

#[derive(Parser)]
#[command(name = "vmsim")]
#[command(about = "Demand-paged virtual address translation simulator", long_about = None)]
struct Cli {
    /// File of whitespace-separated decimal virtual addresses
    address_file: PathBuf,

    /// Binary page store backing the simulated address space
    #[arg(short, long, default_value = "BACKING_STORE.bin")]
    backing_store: PathBuf,

    /// Verify each (virtual, physical, value) triple against a reference file
    #[arg(long, value_name = "FILE")]
    verify: Option<PathBuf>,

    /// Log page faults and TLB evictions as they happen
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), VmError> {
    let addresses = read_virtual_addresses(&cli.address_file)?;
    info!("translating {} virtual addresses", addresses.len());

    let reference = match &cli.verify {
        Some(path) => Some(Reference::from_file(path)?),
        None => None,
    };

    let backing = BackingStore::open(&cli.backing_store)?;
    let mut vm = Translator::new(backing);

    let mut matched: u64 = 0;
    for (line, &address) in addresses.iter().enumerate() {
        let t = vm.translate(address as u32)?;

        println!(
            "Virtual address: {} Physical address: {} Value: {}",
            address, t.physical_addr, t.value
        );

        if let Some(reference) = &reference {
            if reference.matches(line, &t) {
                matched += 1;
            }
        }
    }

    let stats = vm.stats();
    println!();
    println!("Addresses Translated = {}", stats.translated);
    println!("Page Faults = {}", stats.page_faults);
    println!("Page Fault Rate = {:.3}", stats.fault_rate());
    println!("TLB Hits = {}", stats.tlb_hits);
    println!("TLB Hit Rate = {:.3}", stats.hit_rate());

    if reference.is_some() {
        println!("Reference matches = {} / {}", matched, stats.translated);
    }

    Ok(())
}
