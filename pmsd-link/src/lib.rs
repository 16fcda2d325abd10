//! PMSD Link Kernel
//!
//! This crate provides the receive kernel for the PMSD (Particulate Matter
//! Sensor Driver) system: frame assembly, validation, decoding and sensor
//! session control.

pub mod assembler;
pub mod decoder;
pub mod diagnostics;
pub mod sensor;
pub mod traffic_generator;

pub use assembler::{FrameAssembler, FRAME_LENGTH, MARKER_FIRST, MARKER_SECOND};
pub use decoder::decode;
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NullDiagnostics};
pub use sensor::{ControlLine, Pms5003};
pub use traffic_generator::{FrameBuilder, TrafficConfig, TrafficGenerator};
