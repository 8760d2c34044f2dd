use std::fmt;
use std::io;

use crate::types::Vec2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    Empty,
    RaggedRow { row: usize, expected: usize, actual: usize },
    UnknownTile { x: usize, y: usize, tile: char },
    AnchorOutOfBounds { name: &'static str, at: Vec2 },
    AnchorBlocked { name: &'static str, at: Vec2 },
    TooFewWaypoints { count: usize },
    UnreachableCollectible { at: Vec2 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "maze layout has no cells"),
            Self::RaggedRow {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} cells, expected {expected}"),
            Self::UnknownTile { x, y, tile } => {
                write!(f, "unknown tile {tile:?} at ({x},{y})")
            }
            Self::AnchorOutOfBounds { name, at } => {
                write!(f, "{name} ({},{}) lies outside the maze", at.x, at.y)
            }
            Self::AnchorBlocked { name, at } => {
                write!(f, "{name} ({},{}) sits on a barrier", at.x, at.y)
            }
            Self::TooFewWaypoints { count } => {
                write!(f, "need at least 2 patrol waypoints, got {count}")
            }
            Self::UnreachableCollectible { at } => {
                write!(
                    f,
                    "collectible at ({},{}) cannot be reached from the seeker start",
                    at.x, at.y
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Layout(LayoutError),
    InvalidOption { name: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "failed to read config: {error}"),
            Self::Parse(error) => write!(f, "failed to parse config: {error}"),
            Self::Layout(error) => write!(f, "invalid maze layout: {error}"),
            Self::InvalidOption { name, reason } => write!(f, "invalid option {name}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Parse(error) => Some(error),
            Self::Layout(error) => Some(error),
            Self::InvalidOption { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error)
    }
}

impl From<LayoutError> for ConfigError {
    fn from(error: LayoutError) -> Self {
        Self::Layout(error)
    }
}
