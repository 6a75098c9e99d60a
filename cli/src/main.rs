mod config;
mod error;
mod ledger;
mod logging;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Config};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ledger::{seed::initial_friends, Ledger};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use tracing::{error, info};
use ui::{run_app, App};

fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn print_ledger(ledger: &Ledger, currency: &str) {
    println!("{} friends:", ledger.len());
    for friend in ledger.friends() {
        println!(
            "  - {} ({}): {}",
            friend.name,
            friend.id,
            friend.status().describe(&friend.name, currency)
        );
    }
}

fn main() -> Result<()> {
    let config = Config::try_from(Args::parse())?;
    let _log_guard = logging::init(&config)?;

    let friends = if config.seed {
        initial_friends(&config.avatar_base)
    } else {
        Vec::new()
    };
    let ledger = Ledger::new(friends);
    info!(friends = ledger.len(), "ledger ready");

    // List mode - print balances and exit
    if config.list_only {
        print_ledger(&ledger, &config.currency);
        return Ok(());
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(ledger, &config);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    cleanup_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
