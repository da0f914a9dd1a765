mod cli;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use cli::{Cli, Command};
use stockflow_config::{load_config, parse_budget, ConfigData};
use stockflow_core::catalog::Catalog;
use stockflow_core::engine::Engine;
use stockflow_core::inventory::Inventory;
use stockflow_core::trace::Trace;
use stockflow_core::verify::verify_trace;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Checker { config, log }) => check(&config, &log),
        None => {
            let (Some(config), Some(wait)) = (cli.config, cli.wait) else {
                bail!("usage: stockflow <config_file> <wait_seconds>");
            };
            schedule(&config, &wait)
        }
    }
}

fn schedule(config_path: &Path, wait: &str) -> anyhow::Result<()> {
    let budget = parse_budget(wait)?;
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let initial = config.initial_inventory();
    let ConfigData {
        processes,
        optimize_targets,
        ..
    } = config;
    let catalog = Catalog::new(processes)?;

    let mut engine = Engine::new(catalog, initial, &optimize_targets);
    let outcome = engine.run(budget);

    for entry in engine.trace().entries() {
        println!("{entry}");
    }
    println!("{outcome}");
    print_stock(engine.inventory());

    let log_path = log_path_for(config_path);
    fs::write(&log_path, engine.trace().render())
        .with_context(|| format!("writing {}", log_path.display()))?;

    Ok(())
}

fn check(config_path: &Path, log_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let initial = config.initial_inventory();
    let catalog = Catalog::new(config.processes)?;

    let text = fs::read_to_string(log_path)
        .with_context(|| format!("loading {}", log_path.display()))?;
    let trace = Trace::parse(&text);

    let report = verify_trace(&catalog, &initial, &trace)?;

    println!(
        "Trace completed: {} entries, no error detected.",
        report.entries_checked
    );
    print_stock(&report.final_inventory);
    Ok(())
}

/// The scheduler writes next to its input: `<config_path>.log`.
fn log_path_for(config_path: &Path) -> PathBuf {
    let mut name = OsString::from(config_path.as_os_str());
    name.push(".log");
    PathBuf::from(name)
}

fn print_stock(inventory: &Inventory) {
    println!("Stock:");
    for (item, qty) in inventory.iter_sorted() {
        println!(" {item} => {qty}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_appends_to_the_full_file_name() {
        assert_eq!(
            log_path_for(Path::new("plans/furniture.conf")),
            PathBuf::from("plans/furniture.conf.log")
        );
        // No extension-swapping: the original extension stays.
        assert_eq!(
            log_path_for(Path::new("simple")),
            PathBuf::from("simple.log")
        );
    }
}
