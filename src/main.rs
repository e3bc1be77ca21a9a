use std::{io::stdout, path::PathBuf, rc::Rc};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::LevelFilter;

use pageview::backend::MupdfOpener;
use pageview::panic_handler;
use pageview::startup;
use pageview::tui::{self, HostOptions, KeyboardEventSource};
use pageview::viewer::BusyPolicy;

#[derive(Parser, Debug)]
#[command(name = "pageview", version, about = "Paginated PDF viewer for the terminal")]
struct Args {
    /// Document path or file:// URL
    url: String,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<LevelFilter>,

    #[arg(long, default_value = "pageview.log")]
    log_file: PathBuf,

    /// What a re-render does while pages are rendering: restart or drop
    #[arg(long)]
    busy_policy: Option<BusyPolicy>,

    /// Render every page, write PNGs to this directory and exit
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = startup::init_logging_and_settings(
        &args.log_file,
        args.log_level,
        args.config.as_deref(),
    )?;
    if let Some(policy) = args.busy_policy {
        settings.busy_policy = policy;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();

    let viewer = Rc::new(tui::terminal_viewer(MupdfOpener, &settings));

    if let Some(dir) = args.export {
        let written =
            local.block_on(&runtime, tui::export_document(&viewer, &args.url, &dir))?;
        println!("Exported {written} pages to {}", dir.display());
        return Ok(());
    }

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let options = HostOptions {
        url: args.url.clone(),
        scroll_step: settings.scroll_step_px,
        export_dir: PathBuf::from("pageview-export"),
    };
    let res = local.block_on(
        &runtime,
        tui::run_with_event_source(&mut terminal, viewer, &mut KeyboardEventSource, &options),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down pageview");
    Ok(())
}
