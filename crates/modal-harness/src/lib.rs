#![forbid(unsafe_code)]

//! Test harness and reference fixtures for the modal lifecycle engine.
//!
//! - [`StateRecorder`] records every list a manager publishes.
//! - [`DebugModal`], [`render_visible`] and [`DebugApp`] give a textual
//!   stand-in for a rendered UI, so scenarios read like UI tests.
//! - [`capture_tracing`] collects spans and events for log assertions.

pub mod debug_modal;
pub mod recorder;
pub mod tracing_capture;

pub use debug_modal::{
    DEBUG_KEY, DebugApp, DebugHandle, DebugManager, DebugModal, DebugProps, debug_manager,
    debug_windows, render_visible,
};
pub use recorder::{Frame, StateRecorder};
pub use tracing_capture::{CapturedEvent, CapturedSpan, TracingCapture, capture_tracing};
