use debug_port::write_record;
use log::{LevelFilter, Log, Metadata, Record};
use platform_init::{BoardId, BoardProfile, HandoffList, PostMemoryPhase, PreMemoryPhase, SetupOptions};
use silicon_handoff::{BootMode, HandoffFields, unpack_handoff};
use silicon_policy::{BlockSummary, PolicyRegistry, TableSummary};
use std::io::{self, Error};
use std::{env, fs};

const USAGE: &str = "usage: policy-dump pack <board> <out> | inspect <blob> | dump <board>";

fn main() -> io::Result<()> {
    log::set_logger(&StderrLogger).map_err(|e| Error::other(e.to_string()))?;
    log::set_max_level(if env::var_os("POLICY_DUMP_DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let args: Vec<String> = env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["pack", board, out] => pack(&profile(board)?, out),
        ["inspect", blob] => inspect(blob),
        ["dump", board] => dump(&profile(board)?),
        _ => Err(Error::other(USAGE)),
    }
}

/// Runs the pre-memory phase and writes the hand-off it publishes.
fn pack(board: &BoardProfile, out: &str) -> io::Result<()> {
    let mut handoffs = HandoffList::new();
    let blob = PreMemoryPhase::new(board, &SetupOptions::default(), BootMode::FullConfiguration)
        .run(&mut handoffs)
        .map_err(Error::other)?;

    fs::write(out, blob.as_bytes())?;
    eprintln!("packed {} hand-off ({} bytes) into {out}", board.id, blob.as_bytes().len());
    Ok(())
}

fn inspect(path: &str) -> io::Result<()> {
    print_fields(&read_handoff(path)?);
    Ok(())
}

fn read_handoff(path: &str) -> io::Result<HandoffFields> {
    let bytes = fs::read(path)?;
    unpack_handoff(&bytes).map_err(Error::other)
}

/// Boots both phases and prints every installed table.
fn dump(board: &BoardProfile) -> io::Result<()> {
    let setup = SetupOptions::default();
    let pre = PreMemoryPhase::new(board, &setup, BootMode::FullConfiguration);

    print_registry(&pre.build_policies().map_err(Error::other)?);

    let mut handoffs = HandoffList::new();
    pre.run(&mut handoffs).map_err(Error::other)?;
    let post = PostMemoryPhase::new(board, &setup)
        .run(&handoffs)
        .map_err(Error::other)?;
    print_registry(&post);
    Ok(())
}

fn profile(name: &str) -> io::Result<BoardProfile> {
    let id: BoardId = name
        .parse()
        .map_err(|e| Error::other(format!("{e}: {name}")))?;
    Ok(BoardProfile::preset(id))
}

fn print_registry(registry: &PolicyRegistry) {
    println!("[{}]", registry.phase().name());
    for table in registry.installed() {
        println!("{}", TableSummary(table));
        for block in table.blocks() {
            println!("  {}", BlockSummary(&block));
        }
    }
}

fn print_fields(f: &HandoffFields) {
    let m = &f.memory;
    let t = &m.timings;
    let r = &f.resources;
    println!("boot mode      {:?}", f.boot_mode);
    println!(
        "memory         {} MiB, {} MT/s, channels {:#04b}, ecc {}",
        m.total_size_mb, m.frequency_mts, m.channel_mask, m.ecc_enabled
    );
    println!("tolud          {:#010x}", m.tolud);
    println!(
        "timings        CL{} RCD{} RP{} RAS{} RFC{} REFI{} {}T",
        t.tcl, t.trcd, t.trp, t.tras, t.trfc, t.trefi, t.command_rate
    );
    println!("acpi base      {:#06x}", r.acpi_base);
    println!("pcie ecam      {:#x} + {:#x}", r.pcie_ecam_base, r.pcie_ecam_length);
    println!("igd stolen     {:#010x}, {} MiB", r.igd_stolen_base, r.igd_stolen_size_mb);
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut line = String::new();
        if write_record(&mut line, record).is_ok() {
            eprint!("{line}");
        }
    }

    fn flush(&self) {}
}
