mod graphics;
mod widget;

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use lightpath::config::{Cli, Config};
use lightpath::state::EngineState;

use widget::{Flow, RayWidget};

/// Puts the terminal in raw mode with mouse capture and restores it on drop
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(TerminalGuard { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    // Log lines on stderr would tear the alternate screen
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Pipe(Box::new(io::sink())));
        }
    }
    builder.init();
    Ok(())
}

/// Terminal size in cells
fn terminal_size() -> io::Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => terminal::size(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = Config::resolve(&cli)?;
    log::info!("starting with {:?}", config);

    let (cols, rows) = terminal_size()?;
    let mut widget = RayWidget::new(cols, rows, config.display.debug);
    let (width, height) = widget.canvas_size();
    let mut state = EngineState::new(width as f64, height as f64, config.physics.body_diameter);
    state.gravity = config.physics.gravity;
    state.hit_radius = config.display.hit_radius;
    state.solver = config.solver_params();

    let mut guard = TerminalGuard::enter()?;
    let frame = config.display.frame_interval();
    run(&mut guard.out, &mut widget, &mut state, frame)?;
    log::info!("exiting with {} rays", state.scene.len());
    Ok(())
}

fn run<W: Write>(
    out: &mut W,
    widget: &mut RayWidget,
    state: &mut EngineState,
    frame: Duration,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            widget.paint(out, state)?;
            dirty = false;
        }
        if !event::poll(frame)? {
            continue;
        }
        // Drain everything queued so a fast drag repaints once per frame
        loop {
            let event = event::read()?;
            if widget.event(&event, state) == Flow::Quit {
                return Ok(());
            }
            dirty = true;
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
    }
}
