use std::collections::HashMap;
use std::io;
use std::time::Instant;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, Clear, ClearType, SetTitle, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};

use crate::constants::KEY_SUSTAIN;

// --- TerminalGuard: scoped ownership of the raw-mode terminal ---
//
// Dropping the guard restores the terminal, on the clean path and on the
// error-propagation path alike.
pub struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    pub fn acquire(title: &str) -> io::Result<Self> {
        enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
        let mut guard = TerminalGuard { enhanced: false };
        guard.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);

        let mut stdout = io::stdout();
        if guard.enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .map_err(|e| { error!("Failed to enable key release reporting: {}", e); e })?;
        }
        execute!(stdout, SetTitle(title), Hide, Clear(ClearType::All))
            .map_err(|e| { error!("Failed to prepare terminal: {}", e); e })?;

        info!("Terminal acquired (key release events: {}).", guard.enhanced);
        Ok(guard)
    }

    pub fn reports_key_releases(&self) -> bool {
        self.enhanced
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0), Show);
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode on exit: {}", e);
        }
        info!("Terminal released.");
    }
}

// --- Held-key reconstruction from the terminal event stream ---

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeldKeys {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
}

/// Tracks which control keys currently count as held.
///
/// With release reporting, a key is held from its press until its release
/// event. Without it, each press or repeat keeps the key held for a short
/// sustain window, so OS key repeat reads as a continuous hold.
pub struct KeyStates {
    report_releases: bool,
    active: HashMap<KeyCode, Option<Instant>>,
}

impl KeyStates {
    pub fn new(report_releases: bool) -> Self {
        KeyStates {
            report_releases,
            active: HashMap::new(),
        }
    }

    pub fn apply(&mut self, key: &KeyEvent, now: Instant) {
        if !matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Up) {
            return;
        }
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let until = if self.report_releases {
                    None
                } else {
                    Some(now + KEY_SUSTAIN)
                };
                self.active.insert(key.code, until);
            }
            KeyEventKind::Release => {
                self.active.remove(&key.code);
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> HeldKeys {
        let held = |code: KeyCode| match self.active.get(&code) {
            Some(None) => true,
            Some(Some(until)) => *until > now,
            None => false,
        };
        HeldKeys {
            rotate_left: held(KeyCode::Left),
            rotate_right: held(KeyCode::Right),
            thrust: held(KeyCode::Up),
        }
    }
}

// --- SimulatedInput: frame-keyed event script for headless runs ---
pub struct SimulatedInput {
    events: HashMap<u64, Event>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Event>) -> Self {
        SimulatedInput { events }
    }

    pub fn next(&mut self, frame: u64) -> Option<Event> {
        self.events.remove(&frame)
    }
}
