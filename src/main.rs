use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

mod controller;
mod domain;
mod floating;
mod logging;
mod model;
mod page;
mod ui;

use controller::Controller;
use domain::{FHVConfig, FHVError};
use model::{Model, Status};
use page::Page;
use ui::PageUI;

#[derive(Parser, Debug)]
#[command(name = "fhv", version, about = "A tui page viewer with floating table headers.")]
struct Cli {
    /// Number of tables on the demo page
    #[arg(long, default_value_t = 3)]
    tables: usize,

    /// Data rows per table
    #[arg(long, default_value_t = 25)]
    rows: usize,

    /// Write logs to this file (supports ~ and $VARS)
    #[arg(long)]
    log_file: Option<String>,

    /// Event poll time in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_time: u64,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run() -> Result<(), FHVError> {
    let cli = Cli::parse();

    let log_file = match &cli.log_file {
        Some(raw) => Some(PathBuf::from(
            shellexpand::full(raw)
                .map_err(|e| FHVError::PathExpansion(e.to_string()))?
                .into_owned(),
        )),
        None => None,
    };
    let config = FHVConfig::default()
        .event_poll_time(cli.poll_time)
        .log_file(log_file);
    logging::init(&config)?;
    info!("Starting fhv!");

    let page = Page::demo(cli.tables, cli.rows);

    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    let mut model = Model::init(&config, page, size.width as usize, size.height as usize);
    let ui = PageUI::new(&config);
    let controller = Controller::new(&config);

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}
