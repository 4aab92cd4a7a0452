//! Editor configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqerError};
use crate::sequence::DEFAULT_PPQ;
use crate::step::StepSize;

/// Where and how keyboard note entry creates notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertionConfig {
    pub track: u16,
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            track: 1,
            channel: 0,
            note: 60,
            velocity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pointer travel in pixels before a drag registers on an axis
    pub drag_threshold: i32,
    /// Resolution of new sequences
    pub ppq: u16,
    pub steps_per_measure: u32,
    /// Event list row height in pixels
    pub row_height: u32,
    pub pixels_per_beat: f64,
    /// Note lane row height in pixels
    pub key_height: u32,
    pub insertion: InsertionConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 8,
            ppq: DEFAULT_PPQ,
            steps_per_measure: 4,
            row_height: 20,
            pixels_per_beat: 64.0,
            key_height: 8,
            insertion: InsertionConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn step_size(&self) -> StepSize {
        StepSize::StepsPerMeasure(self.steps_per_measure)
    }

    pub fn validate(&self) -> Result<()> {
        if self.drag_threshold < 0 {
            return Err(SeqerError::Config(format!("negative drag threshold {}", self.drag_threshold)));
        }
        if self.ppq == 0 {
            return Err(SeqerError::Config("ppq must be positive".into()));
        }
        if self.steps_per_measure == 0 {
            return Err(SeqerError::Config("steps per measure must be positive".into()));
        }
        if self.row_height == 0 || self.key_height == 0 {
            return Err(SeqerError::Config("row and key heights must be positive".into()));
        }
        if !(self.pixels_per_beat.is_finite() && self.pixels_per_beat > 0.0) {
            return Err(SeqerError::Config(format!("invalid pixels per beat {}", self.pixels_per_beat)));
        }
        if self.insertion.channel > 15 || self.insertion.note > 127 || self.insertion.velocity > 127 {
            return Err(SeqerError::Config("insertion channel/note/velocity out of MIDI range".into()));
        }
        Ok(())
    }
}
