use std::io;
use std::time::{Duration, Instant};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::Rng;
use log::{error, info};

use crate::constants::*;
use crate::entities::{Entity, GameEntity, Player};
use crate::rendering::{OutputTarget, Surface};
use crate::terminal_io::{KeyStates, SimulatedInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Stopped,
}

pub struct Game {
    state: GameState,
    surface: Surface,
    output: OutputTarget,
    key_states: KeyStates,
    simulated_input: Option<SimulatedInput>,
    entities: Vec<GameEntity>,
    max_frames: Option<u64>,
    frame_count: u64,
}

impl Game {
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        output: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        release_events: bool,
        max_frames: Option<u64>,
    ) -> Self {
        let player = Player::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        Game {
            state: GameState::Running,
            surface: Surface::new(terminal_width, terminal_height),
            output,
            key_states: KeyStates::new(release_events),
            simulated_input,
            entities: vec![GameEntity::Player(player)],
            max_frames,
            frame_count: 0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        info!("Game loop starting.");
        let mut rng = rand::thread_rng();
        let mut previous = Instant::now();

        while self.state == GameState::Running
            && (self.max_frames.is_none() || self.frame_count < self.max_frames.unwrap())
        {
            let dt = self.advance_frame_clock(&mut previous)?;
            if self.state != GameState::Running {
                break;
            }
            self.update(dt, &mut rng);
            self.draw()?;
            self.frame_count += 1;
        }

        info!("Game loop finished after {} frames.", self.frame_count);
        for entity in &self.entities {
            info!("Final entity bounds: {:?}", entity.get_rect());
        }
        Ok(())
    }

    /// Waits out the remainder of the frame interval, handling input events as
    /// they arrive, and returns the elapsed time since the previous frame.
    ///
    /// A frame that overruns the interval still drains pending input with
    /// zero-length polls, so slow frames cannot lock out the quit keys.
    ///
    /// Scripted runs skip the wall clock entirely and step by a fixed dt.
    fn advance_frame_clock(&mut self, previous: &mut Instant) -> io::Result<f64> {
        if self.simulated_input.is_some() {
            let frame = self.frame_count;
            let scripted = self.simulated_input.as_mut().and_then(|script| script.next(frame));
            if let Some(event) = scripted {
                self.handle_event(event);
            }
            return Ok(HEADLESS_DT);
        }

        let deadline = *previous + FRAME_INTERVAL;
        loop {
            let wait = poll_budget(deadline, Instant::now());
            if event::poll(wait).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
                self.handle_event(event);
            } else if wait.is_zero() {
                break;
            }
        }
        let now = Instant::now();
        let dt = now.duration_since(*previous).as_secs_f64();
        *previous = now;
        Ok(dt)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press && is_quit_key(&key) => {
                info!("Quit requested, stopping the game loop.");
                self.state = GameState::Stopped;
            }
            Event::Key(key) => self.key_states.apply(&key, Instant::now()),
            Event::Resize(new_width, new_height) => {
                info!("Terminal resized to {}x{}.", new_width, new_height);
                self.surface.resize(new_width, new_height);
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: f64, rng: &mut impl Rng) {
        let held = self.key_states.snapshot(Instant::now());
        for entity in &mut self.entities {
            entity.update(dt, held, rng);
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        self.surface.clear();
        for entity in &self.entities {
            entity.draw(&mut self.surface);
        }
        self.surface.present(&mut self.output)?;
        if let OutputTarget::Buffer(buffer) = &self.output {
            buffer.print_to_log();
        }
        Ok(())
    }
}

fn is_quit_key(key: &event::KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// A missed deadline collapses the budget to zero, it never skips the poll.
fn poll_budget(deadline: Instant, now: Instant) -> Duration {
    deadline.saturating_duration_since(now)
}
