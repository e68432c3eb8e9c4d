use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{cursor, execute, terminal};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quote_board::view::{render_html, render_text};
use quote_board::viewport::TerminalViewport;
use quote_board::{AppConfig, HttpQuoteSource, MountedView, QuoteView, Screen, SimulatedViewport, ViewportPlatform};

/// Width assumed when there is neither `--width` nor a terminal to measure.
const FALLBACK_WIDTH: u32 = 1280;

#[derive(Parser)]
#[command(name = "quote-board", about = "Responsive stock quote board", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the quotes once and print the view
    Show {
        /// Viewport width in CSS pixels (default: measure the terminal)
        #[arg(short, long)]
        width: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Redraw whenever the quotes arrive or the viewport crosses the breakpoint
    Watch {
        /// Viewport width in CSS pixels (default: follow the terminal)
        #[arg(short, long)]
        width: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Html,
}

impl Format {
    fn render(self, screen: &Screen) -> String {
        match self {
            Format::Text => render_text(screen),
            Format::Html => render_html(screen),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "quote_board=info,warn",
        1 => "quote_board=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Show { width, format } => {
            let mut view = mount(&config, width)?;

            let started = Instant::now();
            view.settled().await;
            info!("Fetch settled in {:.2?}", started.elapsed());

            print!("{}", format.render(&view.render()));
            view.unmount();
        }

        Command::Watch { width, format } => {
            let view = mount(&config, width)?;
            let mut changes = view.changes();

            loop {
                redraw(format, &view.render())?;

                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    res = changes.changed() => if res.is_err() { break },
                }
            }

            view.unmount();
        }
    }

    Ok(())
}

fn mount(config: &AppConfig, width: Option<u32>) -> Result<MountedView> {
    let source = HttpQuoteSource::new(&config.fetcher).context("Failed to build quote source")?;

    let platform: Arc<dyn ViewportPlatform> = match width {
        Some(w) => Arc::new(SimulatedViewport::new(w)),
        None => match TerminalViewport::spawn(&config.view) {
            Ok(terminal) => Arc::new(terminal),
            Err(e) => {
                warn!("No terminal to measure ({}), assuming {}px", e, FALLBACK_WIDTH);
                Arc::new(SimulatedViewport::new(FALLBACK_WIDTH))
            }
        },
    };

    let view = QuoteView::from_config(Arc::new(source), platform, config)
        .with_context(|| format!("Invalid breakpoint query {:?}", config.view.breakpoint_query))?;

    Ok(view.mount())
}

fn redraw(format: Format, screen: &Screen) -> Result<()> {
    let mut stdout = io::stdout();
    if matches!(format, Format::Text) {
        execute!(stdout, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
    }
    write!(stdout, "{}", format.render(screen))?;
    stdout.flush()?;
    Ok(())
}
