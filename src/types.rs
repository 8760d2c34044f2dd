use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Search and fallback order. Hunter tie-breaks depend on it.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Collectible,
    PowerCollectible,
    Collected,
    Barrier,
    Gate,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Empty),
            '.' => Some(Self::Collectible),
            'o' => Some(Self::PowerCollectible),
            '_' => Some(Self::Collected),
            '#' => Some(Self::Barrier),
            '-' => Some(Self::Gate),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Collectible => '.',
            Self::PowerCollectible => 'o',
            Self::Collected => '_',
            Self::Barrier => '#',
            Self::Gate => '-',
        }
    }

    pub fn is_collectible(self) -> bool {
        matches!(self, Self::Collectible | Self::PowerCollectible)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_cell(cell: Vec2) -> Self {
        Self {
            x: cell.x as f32,
            y: cell.y as f32,
        }
    }

    /// Nearest cell, rounding halves upward. Not wrapped.
    pub fn nearest_cell(self) -> Vec2 {
        Vec2 {
            x: round_half_up(self.x),
            y: round_half_up(self.y),
        }
    }

    pub fn distance_to(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_to_nearest_cell(self) -> f32 {
        self.distance_to(Position::from_cell(self.nearest_cell()))
    }
}

pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HunterMode {
    Confined,
    Releasing,
    Scatter,
    Chase,
}

impl HunterMode {
    pub fn is_in_house(self) -> bool {
        matches!(self, Self::Confined | Self::Releasing)
    }

    pub fn is_released(self) -> bool {
        matches!(self, Self::Scatter | Self::Chase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalMode {
    Scatter,
    Chase,
}

impl From<GlobalMode> for HunterMode {
    fn from(mode: GlobalMode) -> Self {
        match mode {
            GlobalMode::Scatter => HunterMode::Scatter,
            GlobalMode::Chase => HunterMode::Chase,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Active,
    PowerActive,
    Won,
    Lost,
    Complete,
}

impl SessionStatus {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Active | Self::PowerActive)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SeekerView {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Direction,
    pub autopilot: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct HunterView {
    pub id: String,
    #[serde(rename = "exitOrder")]
    pub exit_order: usize,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub mode: HunterMode,
    pub vulnerable: bool,
    pub visible: bool,
    pub stunned: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    LevelStarted {
        level: u32,
    },
    CollectibleTaken {
        x: i32,
        y: i32,
    },
    PowerTaken {
        x: i32,
        y: i32,
    },
    PowerExpired,
    ModeChanged {
        mode: GlobalMode,
    },
    HunterReleased {
        #[serde(rename = "hunterId")]
        hunter_id: String,
    },
    HunterCaptured {
        #[serde(rename = "hunterId")]
        hunter_id: String,
        bonus: u32,
    },
    HunterStunned {
        #[serde(rename = "hunterId")]
        hunter_id: String,
    },
    HunterRespawned {
        #[serde(rename = "hunterId")]
        hunter_id: String,
    },
    LifeLost {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    LevelWon {
        level: u32,
    },
    SessionLost,
    SessionComplete,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "playTicks")]
    pub play_ticks: u64,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub status: SessionStatus,
    #[serde(rename = "globalMode")]
    pub global_mode: GlobalMode,
    #[serde(rename = "modeTimer")]
    pub mode_timer: u32,
    #[serde(rename = "collectiblesRemaining")]
    pub collectibles_remaining: u32,
    #[serde(rename = "powerTicksLeft")]
    pub power_ticks_left: u32,
    #[serde(rename = "awaitingInput")]
    pub awaiting_input: bool,
    pub seeker: SeekerView,
    pub hunters: Vec<HunterView>,
    pub attractor: Option<Vec2>,
    pub tiles: Vec<String>,
    pub events: Vec<RuntimeEvent>,
}
