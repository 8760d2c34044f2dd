pub const TICK_RATE: u32 = 60;

pub const SEEKER_SPEED: f32 = 0.14;
pub const HUNTER_BASE_SPEED: f32 = SEEKER_SPEED * 0.9;
pub const VULNERABLE_SPEED_MULTIPLIER: f32 = 0.6;

pub const SEEKER_ALIGN_FACTOR: f32 = 0.95;
pub const HUNTER_ALIGN_FACTOR: f32 = 0.5;
pub const EXIT_ROW_TOLERANCE: f32 = 0.05;
pub const EXIT_COLUMN_TOLERANCE: f32 = 0.1;

pub const CONTACT_RADIUS: f32 = 0.65;
pub const WAYPOINT_REACHED_RADIUS: f32 = 0.8;
pub const PATROL_WAYPOINT_CHANCE: f32 = 0.75;

pub const SCATTER_DURATION_TICKS: u32 = 420;
pub const CHASE_DURATION_TICKS: u32 = 1_200;
pub const POWER_DURATION_TICKS: u32 = 600;
pub const RESPAWN_TICKS: u32 = 600;
pub const STUN_TICKS: u32 = 45;
pub const STUN_GRACE_TICKS: u32 = 45;

pub const COLLECTIBLE_SCORE: u32 = 10;
pub const POWER_COLLECTIBLE_SCORE: u32 = 50;
pub const CAPTURE_SCORE: u32 = 200;

pub const STARTING_LIVES: u32 = 3;
pub const FINAL_LEVEL: u32 = 4;
pub const HUNTER_COUNT: usize = 4;

const RELEASE_STAGGER_SECS: i64 = 2;

pub fn release_base_secs(level: u32) -> i64 {
    ((5 - level as i64) * 10).max(0)
}

pub fn hunt_threshold_secs(level: u32) -> i64 {
    ((6 - level as i64) * 60).max(0)
}

pub fn release_tick(level: u32, exit_order: usize) -> u64 {
    let secs = release_base_secs(level) + exit_order as i64 * RELEASE_STAGGER_SECS;
    secs as u64 * TICK_RATE as u64
}

pub fn hunt_threshold_tick(level: u32) -> u64 {
    hunt_threshold_secs(level) as u64 * TICK_RATE as u64
}
