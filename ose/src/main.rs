//! Old-School Essentials character generator.
//!
//! Rolls level-1 characters, validates character files, and uploads
//! characters to the OSE game backend.
//!
//! ```bash
//! cargo run -p ose -- generate --name Thorin --class dwarf
//! ```

mod cli;
mod commands;
mod sheet;

use ose_core::AbilityMethod;
use std::fmt::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run `ose --help` for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Usage text for `ose --help`.
fn help_text() -> String {
    let mut out = String::new();
    out.push_str("OSE - Old-School Essentials character generator\n");
    out.push('\n');
    out.push_str("USAGE:\n");
    out.push_str("  ose <COMMAND> [OPTIONS]\n");
    out.push('\n');
    out.push_str("COMMANDS:\n");
    out.push_str("  generate        Roll a new level-1 character\n");
    out.push_str("  validate <PATH> Check a character JSON file\n");
    out.push_str("  classes         List the classes and their rules\n");
    out.push_str("  roll <NOTATION> Roll dice (3d6, 4d6kh3, 1d20+2)\n");
    out.push_str("  upload          Roll a character and create it on the backend\n");
    out.push_str("  health          Check the backend connection\n");
    out.push('\n');
    out.push_str("GENERATE OPTIONS:\n");
    out.push_str("  --name <NAME>       Character name (required)\n");
    out.push_str("  --class <CLASS>     Character class (required)\n");
    out.push_str("  --method <METHOD>   Ability method (default: classic)\n");
    for method in AbilityMethod::all() {
        let _ = writeln!(out, "      {:<16}{}", method.flag(), method.description());
    }
    out.push_str("  --adjust            Apply the prime requisite adjustment\n");
    out.push_str("  --seed <N>          Seed the dice for a reproducible character\n");
    out.push_str("  --json              Print JSON instead of a character sheet\n");
    out.push_str("  --out <PATH>        Also write the character JSON to PATH\n");
    out.push('\n');
    out.push_str("UPLOAD OPTIONS:\n");
    out.push_str("  --name <NAME>       Character name (required)\n");
    out.push_str("  --class <CLASS>     Character class (required)\n");
    out.push_str("  --session <ID>      Game session id (required)\n");
    out.push_str("  --seed <N>          Seed the dice\n");
    out.push('\n');
    out.push_str("CLASSES:\n");
    out.push_str("  warrior, cleric, wizard, thief, dwarf, elf, halfling\n");
    out.push_str("  (or guerrier, clerc, magicien, voleur, nain, elfe, halfelin)\n");
    out.push('\n');
    out.push_str("ENVIRONMENT:\n");
    out.push_str("  OSE_API_URL           Backend URL (default: http://localhost:8000)\n");
    out.push_str("  OSE_API_USERNAME      Backend username\n");
    out.push_str("  OSE_API_PASSWORD      Backend password\n");
    out.push_str("  OSE_API_TIMEOUT_SECS  Request timeout (default: 30)\n");
    out.push_str("  RUST_LOG              Log filter (default: warn)\n");
    out.push('\n');
    out.push_str("EXAMPLES:\n");
    out.push_str("  ose generate --name Thorin --class dwarf\n");
    out.push_str("  ose generate --name Merlin --class magicien --method heroic --json\n");
    out.push_str("  ose upload --name Bilbo --class halfling --session 3\n");
    out
}
