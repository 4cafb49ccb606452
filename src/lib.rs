//! Photoplethysmography (PPG) pulse oximeter signal pipeline.
//!
//! The pipeline alternately strobes a red (660 nm) and an infrared (940 nm)
//! emitter over a shared photodetector, keeps rolling histories of the
//! reflected intensity, times heartbeats with an adaptive hysteresis detector
//! and estimates blood oxygen saturation from the red/IR absorption ratio.
//! The current estimates and two scrolling waveform plots are rendered to any
//! [`embedded_graphics`] draw target.
//!
//! All hardware access goes through small capability traits
//! ([`PpgSource`], [`Monotonic`], [`FrameSink`] and the `embedded-hal` delay
//! trait), so the same pipeline runs on a microcontroller or against
//! synthetic waveforms in host tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod clock;
pub mod config;
pub mod peak;
pub mod pipeline;
pub mod render;
pub mod signal;
pub mod source;
pub mod spo2;
pub mod threshold;

pub use crate::buffer::RollingBuffer;
pub use crate::clock::Monotonic;
pub use crate::peak::{PeakDetector, PeakState};
pub use crate::pipeline::{CycleError, Oximeter, Pipeline};
pub use crate::render::{Frame, FrameSink};
pub use crate::source::{Channel, Error, PpgSource, StrobedEmitters};
pub use crate::threshold::ThresholdEstimator;
