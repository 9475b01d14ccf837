use thiserror::Error;

mod editor;
pub use editor::*;
pub use hit_test::*;
mod interaction;
pub use interaction::*;
mod layout;
pub use layout::*;
mod mapping;
pub use mapping::*;
mod model;
pub use model::*;
mod render;
pub use render::*;
mod settings;
pub use settings::*;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid segment [{start}, {end}) for duration {duration}")]
    InvalidSegment { start: f64, end: f64, duration: f64 },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Seconds = f64; // timeline time, always in seconds
