use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::input::KeyBindings;
use super::rendering::VirtualResolution;

/// Every recognized knob of the engine. Defaults give the stock handheld
/// setup: 256x144 virtual frame in a 2048 buffer, 128x128 grid at a 16-texel
/// pitch, coin-flip tile inclusion, 0.25 s animation tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub virtual_width: u32,
    pub virtual_height: u32,
    pub buffer_size: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub cell_pitch: u32,
    pub inclusion_probability: f64,
    pub animation_interval_ms: u64,
    pub scroll_x: i32,
    pub scroll_y: i32,
    pub stats_log_interval_ms: u64,
    pub bindings: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "Retro GE".to_string(),
            window_width: 1280,
            window_height: 720,
            virtual_width: 256,
            virtual_height: 144,
            buffer_size: 2048,
            grid_width: 128,
            grid_height: 128,
            cell_pitch: 16,
            inclusion_probability: 0.5,
            animation_interval_ms: 250,
            // Static view centering, one tile right of the buffer midpoint.
            scroll_x: 16,
            scroll_y: 0,
            stats_log_interval_ms: 1000,
            bindings: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("virtual resolution must be non-zero on both axes")]
    ZeroVirtualResolution,
    #[error("window size must be non-zero on both axes")]
    ZeroWindowSize,
    #[error("cell pitch must be non-zero")]
    ZeroCellPitch,
    #[error("tile inclusion probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange { value: f64 },
    #[error("animation interval must be non-zero")]
    ZeroAnimationInterval,
    #[error(
        "crop window ({virtual_size}) exceeds backing buffer ({buffer_size}) on the {axis} axis"
    )]
    CropExceedsBuffer {
        axis: &'static str,
        virtual_size: u32,
        buffer_size: u32,
    },
    #[error(
        "scrolled crop window leaves the backing buffer on the {axis} axis \
(origin {origin}, extent {extent}, buffer {buffer_size})"
    )]
    ScrollOutOfBounds {
        axis: &'static str,
        origin: i64,
        extent: u32,
        buffer_size: u32,
    },
    #[error("unrecognized key name {name:?} bound to {role}")]
    UnknownKeyBinding { role: &'static str, name: String },
}

impl Config {
    pub fn virtual_resolution(&self) -> VirtualResolution {
        VirtualResolution {
            width: self.virtual_width,
            height: self.virtual_height,
        }
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    pub fn stats_log_interval(&self) -> Duration {
        Duration::from_millis(self.stats_log_interval_ms)
    }

    /// Rejects inconsistent configurations before any buffer is allocated or
    /// frame rendered. Key bindings are resolved separately at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.virtual_width == 0 || self.virtual_height == 0 {
            return Err(ConfigError::ZeroVirtualResolution);
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.cell_pitch == 0 {
            return Err(ConfigError::ZeroCellPitch);
        }
        if !(0.0..=1.0).contains(&self.inclusion_probability) {
            return Err(ConfigError::ProbabilityOutOfRange {
                value: self.inclusion_probability,
            });
        }
        if self.animation_interval_ms == 0 {
            return Err(ConfigError::ZeroAnimationInterval);
        }

        for (axis, virtual_size) in [("x", self.virtual_width), ("y", self.virtual_height)] {
            if virtual_size > self.buffer_size {
                return Err(ConfigError::CropExceedsBuffer {
                    axis,
                    virtual_size,
                    buffer_size: self.buffer_size,
                });
            }
        }
        for (axis, virtual_size, scroll) in [
            ("x", self.virtual_width, self.scroll_x),
            ("y", self.virtual_height, self.scroll_y),
        ] {
            let origin =
                self.buffer_size as i64 / 2 + scroll as i64 - virtual_size as i64 / 2;
            if origin < 0 || origin + virtual_size as i64 > self.buffer_size as i64 {
                return Err(ConfigError::ScrollOutOfBounds {
                    axis,
                    origin,
                    extent: virtual_size,
                    buffer_size: self.buffer_size,
                });
            }
        }
        Ok(())
    }
}
