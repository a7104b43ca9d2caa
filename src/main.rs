use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use gpu_catalog::cli::{Cli, Command};
use gpu_catalog::ui::help::help_seeded;
use gpu_catalog::{app, commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let code = match cli.cmd.unwrap_or(Command::Menu) {
        Command::Menu => app::run_menu(&cli.db, Duration::from_millis(cli.pause_ms))?,

        Command::List { order_by, desc, ids } => {
            let listing = commands::list::list(&cli.db, order_by.as_deref(), desc, ids)?;
            if listing.seeded {
                eprintln!("{}", help_seeded(&cli.db));
            }
            print!("{}", listing.table);
            0
        }

        Command::Init { force } => {
            let id = commands::init::init(&cli.db, force)?;
            println!("✓ Wrote {} (sample GPU id {id})", cli.db.display());
            0
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
