mod config;
mod input;
mod loop_runner;
pub(crate) mod rendering;
mod scene;
mod stats;
mod timer;

pub use config::{Config, ConfigError};
pub use input::{EventQueue, GameEvent, KeyBindings};
pub use loop_runner::{run_app, AppError};
pub use rendering::{
    crop_half_extent, OffscreenBuffer, Presenter, ScrollOffset, VirtualResolution,
};
pub use scene::{Stage, GB_GREEN};
pub use stats::FrameStatsSnapshot;
pub use timer::AnimationTimer;
