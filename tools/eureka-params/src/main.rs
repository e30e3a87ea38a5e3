//! eureka-params: inspect and prepare the robot's parameter tables.
//!
//! Usage:
//!   eureka-params defaults --output data/config.json
//!   eureka-params show --input data/config.json
//!   eureka-params grid --input data/config.json --limit 10

use std::path::PathBuf;
use std::process;

use eureka_brain::BrainConfig;
use eureka_core::params::{Parameter, ParameterTable};
use eureka_core::tuning::ParameterGrid;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "defaults" => cmd_defaults(&args[2..]),
        "show" => cmd_show(&args[2..]),
        "grid" => cmd_grid(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "eureka-params: parameter table tool\n\
         \n\
         Commands:\n\
         \n\
         defaults  Write the default table\n\
         \n\
           --output <path>    Output JSON path (config.json or training.json)\n\
         \n\
         show      Print a table as the robot would resolve it\n\
         \n\
           --input <path>     Table to read (missing file = defaults)\n\
         \n\
         grid      Enumerate the tuning sweep of a table\n\
         \n\
           --input <path>     Table to read (missing file = defaults)\n\
           --limit <N>        Combinations to print (default: 0)\n"
    );
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_limit(args: &[String], default: usize) -> usize {
    parse_flag(args, "--limit")
        .and_then(|n| n.parse().ok())
        .unwrap_or(default)
}

fn require_path(args: &[String], flag: &str) -> PathBuf {
    match parse_flag(args, flag) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: {flag} <path> is required");
            process::exit(1);
        }
    }
}

/// Load a table and fill in any missing knob.
fn load_resolved(args: &[String]) -> (ParameterTable, BrainConfig) {
    let input = require_path(args, "--input");
    let mut table = match ParameterTable::load(&input) {
        Ok(Some(table)) => table,
        Ok(None) => {
            log::info!("{} not found, using defaults", input.display());
            ParameterTable::new()
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let config = BrainConfig::resolve(&mut table);
    (table, config)
}

// --- Defaults command ---

fn cmd_defaults(args: &[String]) {
    let output = require_path(args, "--output");
    let table = BrainConfig::default_table();
    match table.save(&output) {
        Ok(()) => eprintln!("Wrote {} parameters to {}", table.len(), output.display()),
        Err(e) => {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
    }
}

// --- Show command ---

fn cmd_show(args: &[String]) {
    let (table, config) = load_resolved(args);
    for (name, parameter) in table.iter() {
        match parameter {
            Parameter::Constant { value } => println!("{name:<24} {value:>8}  (constant)"),
            Parameter::Range {
                value,
                min,
                max,
                step,
            } => println!("{name:<24} {value:>8}  [{min}..={max} step {step}]"),
        }
    }
    match config.validate() {
        Ok(()) => println!("valid"),
        Err(e) => println!("INVALID: {e}"),
    }
}

// --- Grid command ---

fn cmd_grid(args: &[String]) {
    let (table, _) = load_resolved(args);
    let limit = parse_limit(args, 0);
    let grid = ParameterGrid::new(&table);

    println!("dimensions: {}", grid.dimensions().join(", "));
    println!("combinations: {}", grid.combinations());

    let dimensions = grid.dimensions().to_vec();
    let mut valid = 0;
    for (i, combination) in grid.enumerate() {
        if !BrainConfig::is_valid_table(&combination) {
            continue;
        }
        valid += 1;
        if i < limit {
            let values: Vec<String> = dimensions
                .iter()
                .filter_map(|name| combination.get(name).map(|p| format!("{name}={}", p.value())))
                .collect();
            println!("#{i}: {}", values.join(" "));
        }
    }
    println!("valid: {valid}");
}
