//! APEX out-of-order pipeline simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Batch run:** Load an assembly file, simulate until `HALT` or a cycle limit, and
//!    print the final state and statistics.
//! 2. **Console:** An interactive command loop for stepping a program and inspecting
//!    the pipeline, rename tables, register file and memory.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use apexsim_core::Simulator;
use apexsim_core::config::Config;
use apexsim_core::sim::loader;
use apexsim_core::stats::STATS_SECTIONS;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "apexsim",
    author,
    version,
    about = "APEX out-of-order pipeline simulator",
    long_about = "Simulate an APEX assembly program on a speculative out-of-order pipeline.\n\nExamples:\n  apexsim run program.asm\n  apexsim run program.asm --cycles 50 --trace\n  apexsim console --config machine.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until HALT or the cycle limit.
    Run {
        /// Assembly file to execute.
        file: PathBuf,

        /// Maximum number of cycles to simulate.
        #[arg(short, long, default_value_t = 100_000)]
        cycles: u64,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log every pipeline event at debug level.
        #[arg(long)]
        trace: bool,
    },

    /// Interactive console reading commands from stdin.
    Console {
        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log every pipeline event at debug level.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            cycles,
            config,
            trace,
        } => {
            let config = load_config(config.as_deref());
            init_logging(trace || config.general.trace);
            cmd_run(config, &file, cycles);
        }
        Commands::Console { config, trace } => {
            let config = load_config(config.as_deref());
            init_logging(trace || config.general.trace);
            cmd_console(config);
        }
    }
}

/// Reads the configuration file, or returns the defaults. Exits on error.
fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    Config::from_file(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    })
}

/// Installs the log subscriber. `RUST_LOG` overrides the default level.
fn init_logging(trace: bool) {
    let default_level = if trace { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads `file`, simulates up to `cycles` cycles and prints the result.
///
/// Exits with code 1 on a load error or fault, and 2 if the cycle limit is reached
/// before `HALT`.
fn cmd_run(config: Config, file: &Path, cycles: u64) {
    let mut sim = Simulator::new(config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });
    let program = loader::load_program(file).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });

    println!("[*] Loading {} ({} instructions)", file.display(), program.len());
    if let Err(e) = sim.initialize(program) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }

    let outcome = sim.cycle(cycles);
    print_state(&sim);
    sim.stats().print();

    match outcome {
        Ok(true) => println!("\n[*] HALT retired after {} cycles", sim.stats().cycles),
        Ok(false) => {
            println!("\n[!] Cycle limit ({cycles}) reached before HALT");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Runs the interactive command loop until `Exit` or end of input.
fn cmd_console(config: Config) {
    let mut sim = Simulator::new(config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });

    println!("APEX simulator console. Type `Help` for commands.");
    let stdin = io::stdin();
    loop {
        print!("apex> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("[!] {e}");
                break;
            }
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        if !run_command(&mut sim, &command.to_ascii_lowercase(), args) {
            break;
        }
    }
}

/// Executes one console command.
///
/// # Returns
///
/// `false` when the console should exit.
fn run_command(sim: &mut Simulator, command: &str, args: &[&str]) -> bool {
    match (command, args) {
        ("initialize", [file]) => match loader::load_program(Path::new(file)) {
            Ok(program) => match sim.initialize(program) {
                Ok(()) => println!("Loaded {file}"),
                Err(e) => println!("[!] {e}"),
            },
            Err(e) => println!("[!] {e}"),
        },
        ("simulate", [n]) => match n.parse::<u64>() {
            Ok(n) => match sim.cycle(n) {
                Ok(true) => println!("HALT retired at cycle {}", sim.stats().cycles),
                Ok(false) => println!("cycle {}", sim.stats().cycles),
                Err(e) => println!("[!] {e}"),
            },
            Err(_) => println!("[!] Simulate expects a cycle count"),
        },
        ("set_urf_size", [n]) => match n.parse::<usize>() {
            Ok(n) => match sim.set_physical_registers(n) {
                Ok(()) => println!("URF resized to {n}; Initialize again to load a program"),
                Err(e) => println!("[!] {e}"),
            },
            Err(_) => println!("[!] Set_URF_size expects a register count"),
        },
        ("display", []) => print!("{sim}"),
        ("print_map_tables", []) => print_map_tables(sim),
        ("print_iq", []) => print_iq(sim),
        ("print_rob", []) => print_rob(sim),
        ("print_urf", []) => print_urf(sim),
        ("print_memory", [start, end]) => match (start.parse::<i32>(), end.parse::<i32>()) {
            (Ok(start), Ok(end)) => print_memory(sim, start, end),
            _ => println!("[!] Print_Memory expects two addresses"),
        },
        ("print_stats", sections) => print_stats(sim, sections),
        ("help", []) => print_help(),
        ("exit" | "quit", []) => return false,
        _ => println!("[!] Unknown command `{command}`; type `Help`"),
    }
    true
}

fn print_help() {
    println!("  Initialize <file>          load a program and reset the machine");
    println!("  Simulate <n>               advance up to n cycles");
    println!("  Set_URF_size <n>           rebuild with n physical registers");
    println!("  Display                    show every pipeline stage");
    println!("  Print_map_tables           show RAT and RRAT");
    println!("  Print_IQ                   show the issue queue");
    println!("  Print_ROB                  show the reorder buffer");
    println!("  Print_URF                  show the physical registers");
    println!("  Print_Memory <start> <end> show memory words");
    println!("  Print_Stats [section..]    show statistics ({})", STATS_SECTIONS.join(", "));
    println!("  Exit");
}

fn print_state(sim: &Simulator) {
    println!("\n==========================================================");
    println!("ARCHITECTURAL STATE");
    println!("==========================================================");
    for (index, phys) in sim.rrat().iter().enumerate() {
        let name = sim.arch_name(index);
        let value = sim.register_value(name).unwrap_or_default();
        println!("  {name:<4} = {value:<12} ({phys})");
    }
    let written: Vec<u32> = sim.recent_writes().collect();
    if !written.is_empty() {
        println!("MEMORY (recently written)");
        for addr in written {
            let value = sim
                .memory_range(addr as i32, addr as i32)
                .ok()
                .and_then(|words| words.first().map(|&(_, v)| v))
                .unwrap_or_default();
            println!("  MEM[{addr}] = {value}");
        }
    }
}

fn print_map_tables(sim: &Simulator) {
    println!("  {:<5} {:<6} {:<6}", "ARCH", "RAT", "RRAT");
    for (index, (rat, rrat)) in sim.rat().iter().zip(sim.rrat()).enumerate() {
        println!("  {:<5} {:<6} {:<6}", sim.arch_name(index).to_string(), rat.to_string(), rrat.to_string());
    }
}

fn print_iq(sim: &Simulator) {
    if sim.issue_queue().next().is_none() {
        println!("  (empty)");
    }
    for entry in sim.issue_queue() {
        let operand = |valid: bool, value: i32| {
            if valid {
                value.to_string()
            } else {
                "-".to_owned()
            }
        };
        println!(
            "  ({}) {:<22} src1={:<8} src2={:<8} rob={}",
            entry.pc,
            entry.decoded.to_string(),
            operand(entry.src1.valid, entry.src1.value),
            operand(entry.src2.valid, entry.src2.value),
            entry.rob_tag.0
        );
    }
}

fn print_rob(sim: &Simulator) {
    if sim.rob_entries().next().is_none() {
        println!("  (empty)");
    }
    for entry in sim.rob_entries() {
        let state = if entry.is_completed() { "done" } else { "busy" };
        let branch = if entry.taken {
            format!(" taken->{}", entry.target)
        } else {
            String::new()
        };
        println!(
            "  [{}] ({}) {:<22} {state}{branch}",
            entry.tag.0,
            entry.pc,
            entry.decoded.to_string()
        );
    }
}

fn print_urf(sim: &Simulator) {
    for (reg, cell, allocated) in sim.physical_registers() {
        let status = match (allocated, cell.valid) {
            (false, _) => "free",
            (true, true) => "committed",
            (true, false) => "pending",
        };
        println!("  {:<4} = {:<12} {status}", reg.to_string(), cell.value);
    }
    println!("  free: {}", sim.free_registers());
}

fn print_stats(sim: &Simulator, sections: &[&str]) {
    let sections: Vec<String> = sections.iter().map(|s| s.to_ascii_lowercase()).collect();
    if let Some(unknown) = sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        println!("[!] Unknown section `{unknown}`; expected one of {}", STATS_SECTIONS.join(", "));
        return;
    }
    sim.stats().print_sections(&sections);
}

fn print_memory(sim: &Simulator, start: i32, end: i32) {
    match sim.memory_range(start, end) {
        Ok(words) => {
            for (addr, value) in words {
                println!("  MEM[{addr}] = {value}");
            }
        }
        Err(e) => println!("[!] {e}"),
    }
}
