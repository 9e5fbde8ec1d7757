use std::collections::HashMap;
use std::env;
use std::io;
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use log::{error, info};

mod constants;
mod entities;
mod game;
mod particles;
mod rendering;
mod terminal_io;
mod types;

use game::Game;
use rendering::{OutputTarget, ScreenBuffer};
use terminal_io::{SimulatedInput, TerminalGuard};

fn main() -> io::Result<()> {
    simple_logging::log_to_file("stellar-drift.log", log::LevelFilter::Info)?;
    info!("Starting stellar-drift.");

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("--headless") {
        let frames = args.get(2).and_then(|n| n.parse().ok()).unwrap_or(240);
        return run_headless(frames);
    }

    let guard = TerminalGuard::acquire("Space Shooter")?;
    let (width, height) = terminal::size()
        .map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}.", width, height);

    let mut game = Game::new(
        width,
        height,
        OutputTarget::Stdout(io::stdout()),
        None,
        guard.reports_key_releases(),
        None,
    );
    let result = game.run();
    drop(guard);

    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    result
}

/// Runs the simulation against an in-memory screen with scripted input,
/// logging each rendered frame instead of touching the terminal.
fn run_headless(frames: u64) -> io::Result<()> {
    info!("Headless mode: {} frames at a fixed 60 Hz step.", frames);
    let buffer = ScreenBuffer::new(80, 24);
    let script = SimulatedInput::new(flight_script());
    let mut game = Game::new(80, 24, OutputTarget::Buffer(buffer), Some(script), true, Some(frames));
    game.run()
}

fn flight_script() -> HashMap<u64, Event> {
    let mut events = HashMap::new();
    events.insert(2, press(KeyCode::Right)); // Half a second of rotation
    events.insert(32, release(KeyCode::Right));
    events.insert(40, press(KeyCode::Up)); // One second of thrust
    events.insert(100, release(KeyCode::Up));
    events.insert(150, press(KeyCode::Esc)); // Quit before the frame cap
    events
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release))
}
