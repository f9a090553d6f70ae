//! Frame timing.
//!
//! The render loop itself is unpaced; a `FrameClock` only measures the time
//! between GUI frames so the GUI library can animate and detect double clicks.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
