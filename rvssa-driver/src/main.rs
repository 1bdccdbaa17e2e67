//! RISC-V SSA Backend Driver
//!
//! Command-line front end for the lowering stage: reads scheduled,
//! register-allocated SSA functions as JSON and prints the RV64 instruction
//! stream with symbolic branch targets.

mod demos;

use clap::{ArgAction, Parser, Subcommand};
use log::info;
use rvssa_backend::{lower_function, FuncOutput, IgnoreLiveness, LoweringOptions};
use rvssa_codegen::emit_instructions;
use rvssa_ir::{func_to_json, load_func_json, Func};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rvssa")]
#[command(about = "RISC-V SSA lowering backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LowerFlags {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a listing with block labels and branch targets
    #[arg(long)]
    listing: bool,

    /// Annotate listing lines with source positions
    #[arg(long, requires = "listing")]
    lines: bool,

    /// Lowering options as JSON (command-line flags take precedence)
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Skip the base register check on address materialization
    #[arg(long)]
    no_base_check: bool,

    /// Write output even if some lowerings are unimplemented
    #[arg(long)]
    allow_gaps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower SSA functions from JSON files
    Lower {
        /// Input files, one function each
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        flags: LowerFlags,
    },

    /// Load and validate SSA functions without lowering them
    Check {
        inputs: Vec<PathBuf>,

        /// Print the parsed function
        #[arg(long)]
        print: bool,
    },

    /// Lower one of the built-in demo functions
    Demo {
        /// Which demo to run (exit, max, sum)
        #[arg(default_value = "exit")]
        name: String,

        /// Print the demo's SSA as JSON instead of lowering it
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        flags: LowerFlags,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Lower { inputs, flags } => lower_files(&inputs, &flags),
        Commands::Check { inputs, print } => check_files(&inputs, print),
        Commands::Demo { name, json, flags } => run_demo(&name, json, &flags),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn lowering_options(flags: &LowerFlags) -> Result<LoweringOptions, Box<dyn std::error::Error>> {
    let text = match &flags.options {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    merge_options(text.as_deref(), flags.no_base_check)
}

/// Options file contents (if any) with command-line overrides applied
fn merge_options(
    json: Option<&str>,
    no_base_check: bool,
) -> Result<LoweringOptions, Box<dyn std::error::Error>> {
    let mut options = match json {
        Some(text) => serde_json::from_str(text)?,
        None => LoweringOptions::default(),
    };
    if no_base_check {
        options.check_base_reg = false;
    }
    Ok(options)
}

fn read_func(path: &Path) -> Result<Func, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    load_func_json(&text).map_err(|e| format!("{}: {}", path.display(), e).into())
}

fn lower_files(inputs: &[PathBuf], flags: &LowerFlags) -> Result<(), Box<dyn std::error::Error>> {
    let mut funcs = Vec::new();
    for path in inputs {
        info!("Reading {}", path.display());
        funcs.push(read_func(path)?);
    }
    lower_and_write(&funcs, flags)
}

fn lower_and_write(funcs: &[Func], flags: &LowerFlags) -> Result<(), Box<dyn std::error::Error>> {
    let options = lowering_options(flags)?;
    let mut text = String::new();

    for func in funcs {
        let out = lower_function(func, &options, &mut IgnoreLiveness)
            .map_err(|e| format!("{}: {}", func.name, e))?;
        check_gaps(&out, flags.allow_gaps)?;
        text.push_str(&render(&out, flags));
    }

    match &flags.output {
        Some(path) => {
            fs::write(path, &text)?;
            println!("Assembly written to: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn check_gaps(out: &FuncOutput, allow_gaps: bool) -> Result<(), Box<dyn std::error::Error>> {
    if out.is_complete() || allow_gaps {
        return Ok(());
    }
    let mut msg = format!("{}: {} unimplemented lowering(s)", out.name, out.gaps.len());
    for gap in &out.gaps {
        msg.push_str(&format!("\n  {}", gap));
    }
    msg.push_str("\n(use --allow-gaps to write the output anyway)");
    Err(msg.into())
}

fn render(out: &FuncOutput, flags: &LowerFlags) -> String {
    if flags.listing {
        out.listing(flags.lines)
    } else {
        format!("{}:\n{}", out.name, emit_instructions(&out.stream))
    }
}

fn check_files(inputs: &[PathBuf], print: bool) -> Result<(), Box<dyn std::error::Error>> {
    for path in inputs {
        let func = read_func(path)?;
        println!(
            "{}: function '{}' ok ({} blocks, {} values)",
            path.display(),
            func.name,
            func.blocks.len(),
            func.values.len()
        );
        if print {
            print!("{}", func);
        }
    }
    Ok(())
}

fn run_demo(name: &str, json: bool, flags: &LowerFlags) -> Result<(), Box<dyn std::error::Error>> {
    let func = demos::demo(name).ok_or_else(|| {
        format!("Unknown demo: {} (available: {})", name, demos::NAMES.join(", "))
    })?;

    if json {
        println!("{}", func_to_json(&func)?);
        return Ok(());
    }

    println!("SSA:\n{}", func);
    lower_and_write(std::slice::from_ref(&func), flags)
}
