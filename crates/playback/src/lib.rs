mod config;
mod controller;
mod error;
pub mod machine;
mod segments;
mod source;
mod state;
pub mod throttle;

pub use config::PlaybackConfig;
pub use controller::{PlaybackActor, PlaybackArgs, PlaybackController, PlaybackMsg};
pub use error::{Error, MediaError, Result};
pub use machine::{Directive, PlaybackMachine};
pub use segments::SegmentIndex;
pub use source::{BoxFuture, MediaEvent, MediaSource};
pub use state::{Phase, PublishedState};
pub use throttle::{Offer, ToggleThrottle};
