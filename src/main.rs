use std::{fs::File, io::stdout, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use intellipdf::event_source::KeyboardEventSource;
use intellipdf::main_app::{App, AppConfig, run_app_with_event_source};
use intellipdf::panic_handler::initialize_panic_handler;
use intellipdf::settings;
use intellipdf::theme::{ThemeId, set_theme};

#[derive(Parser, Debug)]
#[command(name = "intellipdf")]
#[command(about = "Intelligent document analysis in the terminal", long_about = None)]
struct Args {
    /// Open this document reference directly in the viewer
    #[arg(short, long, value_name = "REF")]
    open: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, value_name = "PATH", default_value = "intellipdf.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), File::create(&args.log_file)?)?;

    info!("Starting IntelliPDF");

    settings::load_settings(args.config.as_deref());
    let theme_name = settings::get_theme_name();
    match ThemeId::from_name(&theme_name) {
        Some(theme) => set_theme(theme),
        None => warn!("Unknown theme {theme_name:?}, keeping the default"),
    }

    let config = AppConfig {
        initial_document: args.open,
        ..AppConfig::from_settings()
    };

    initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new_with_config(config, Box::new(intellipdf::upload::log_upload));
    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down IntelliPDF");
    Ok(())
}
