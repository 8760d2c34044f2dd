use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{FINAL_LEVEL, STARTING_LIVES};
use crate::error::ConfigError;
use crate::maze::MazeLayout;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactRule {
    #[default]
    LoseLife,
    Stun,
}

impl ContactRule {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lose_life" => Some(Self::LoseLife),
            "stun" => Some(Self::Stun),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoseLife => "lose_life",
            Self::Stun => "stun",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub contact_rule: ContactRule,
    /// Ticks after each (re)start before autopilot takes its first step.
    pub autopilot_warmup_ticks: u32,
    pub starting_lives: u32,
    pub final_level: u32,
    pub layout: MazeLayout,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            contact_rule: ContactRule::default(),
            autopilot_warmup_ticks: 0,
            starting_lives: STARTING_LIVES,
            final_level: FINAL_LEVEL,
            layout: MazeLayout::classic(),
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::InvalidOption {
                name: "starting_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.final_level == 0 {
            return Err(ConfigError::InvalidOption {
                name: "final_level",
                reason: "must be at least 1".to_string(),
            });
        }
        self.layout.build()?;
        Ok(())
    }
}

pub fn parse_options(text: &str) -> Result<EngineOptions, ConfigError> {
    let options: EngineOptions = serde_json::from_str(text)?;
    options.validate()?;
    Ok(options)
}

pub fn load_options(path: &Path) -> Result<EngineOptions, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_options(&text)
}
