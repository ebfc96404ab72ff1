use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use savevault::cli::{
    handle_export_command, handle_slot_command, handle_value_command, ExportArgs, SlotCommands,
    ValueCommands,
};
use savevault::config::{SavePaths, Settings};
use savevault::storage;

#[derive(Parser)]
#[command(
    name = "savevault",
    version,
    about = "Encrypted multi-slot save storage",
    long_about = "SaveVault keeps key-value saves in numbered slot files, each \
                  encrypted with a key derived from this device. Values can be \
                  read, written and exported from the command line."
)]
struct Cli {
    /// Data directory (overrides SAVEVAULT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Product name used to prefix slot files
    #[arg(long, global = true)]
    product: Option<String>,

    /// Device identifier for key derivation (defaults to the machine id)
    #[arg(long, global = true, env = "SAVEVAULT_DEVICE_ID", hide_env_values = true)]
    device_id: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Value(ValueCommands),

    /// Save slot management commands
    #[command(subcommand)]
    Slot(SlotCommands),

    /// Export the current slot
    Export(ExportArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => SavePaths::with_base_dir(dir),
        None => SavePaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;
    if !paths.settings_file().exists() {
        settings.save(&paths)?;
    }
    if let Some(product) = cli.product {
        settings.product_name = product;
        settings.validate()?;
    }

    let Some(command) = cli.command else {
        println!("SaveVault - encrypted multi-slot save storage");
        println!();
        println!("Run 'savevault --help' for usage information.");
        return Ok(());
    };

    if let Commands::Config = command {
        println!("SaveVault Configuration");
        println!("=======================");
        println!("Data directory:   {}", paths.base_dir().display());
        println!("Saves directory:  {}", paths.saves_dir().display());
        println!("Settings file:    {}", paths.settings_file().display());
        println!("Preferences file: {}", paths.preferences_file().display());
        println!();
        println!("Settings:");
        println!("  Product name:  {}", settings.product_name);
        println!("  Fallback slot: {}", settings.fallback_slot);
        return Ok(());
    }

    // Initialize slot storage
    let mut slots = storage::open(paths, &settings, cli.device_id)?;
    slots.set_reload_hook(|index| println!("Now using slot {}", index));

    match command {
        Commands::Value(cmd) => handle_value_command(&mut slots, cmd)?,
        Commands::Slot(cmd) => handle_slot_command(&mut slots, settings.fallback_slot, cmd)?,
        Commands::Export(args) => handle_export_command(&mut slots, args)?,
        Commands::Config => {}
    }

    Ok(())
}
