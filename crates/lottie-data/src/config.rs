use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::BlendMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(f32),
    #[error("end frame {end} precedes start frame {start}")]
    InvalidFrameRange { start: i32, end: i32 },
    #[error("failed to parse composition config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_frame_rate() -> f32 {
    60.0
}

fn default_arena_capacity() -> usize {
    2048
}

/// Composition-level settings supplied by the document builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub start_frame: i32,
    #[serde(default)]
    pub end_frame: i32,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Number of nodes reserved up front in the composition arena.
    #[serde(default = "default_arena_capacity")]
    pub arena_capacity: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            version: String::new(),
            width: 0,
            height: 0,
            start_frame: 0,
            end_frame: 0,
            frame_rate: default_frame_rate(),
            blend_mode: BlendMode::Normal,
            arena_capacity: default_arena_capacity(),
        }
    }
}

impl CompositionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CompositionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if self.end_frame < self.start_frame {
            return Err(ConfigError::InvalidFrameRange {
                start: self.start_frame,
                end: self.end_frame,
            });
        }
        Ok(())
    }
}
