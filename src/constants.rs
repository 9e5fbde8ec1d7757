use std::time::Duration;

// --- World Constants ---
pub const WORLD_WIDTH: f64 = 800.0; // World units, fixed regardless of terminal size
pub const WORLD_HEIGHT: f64 = 600.0;
pub const TARGET_FPS: u64 = 60;
pub const FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000u64.div_ceil(TARGET_FPS)); // Rounded up, never paces above the target rate
pub const HEADLESS_DT: f64 = 1.0 / TARGET_FPS as f64; // Fixed step for scripted runs

// --- Player Constants ---
pub const PLAYER_WIDTH: i32 = 40; // World units
pub const PLAYER_HEIGHT: i32 = 40;
pub const PLAYER_THRUST: f64 = 300.0; // World units per second squared
pub const PLAYER_TURN_RATE: f64 = 180.0; // Degrees per second
pub const PLAYER_FRICTION: f64 = 0.99; // Per frame, not per second
pub const CRAFT_GLYPH: char = '#';

// --- Thruster Particle Constants ---
pub const THRUSTER_PARTICLE_COUNT: usize = 5; // Per frame while thrust is held
pub const THRUSTER_PARTICLE_SPEED: f64 = 100.0; // World units per second
pub const PARTICLE_RADIUS: f64 = 2.0; // World units
pub const PARTICLE_MIN_LIFETIME: f64 = 0.5; // Seconds
pub const PARTICLE_MAX_LIFETIME: f64 = 1.5; // Seconds, also the fade reference

// --- Input Constants ---
pub const KEY_SUSTAIN: Duration = Duration::from_millis(150); // Held window per press/repeat when release events are unavailable

// --- Colors ---
pub const WHITE: (u8, u8, u8) = (255, 255, 255);
pub const BLUE: (u8, u8, u8) = (0, 0, 255);
