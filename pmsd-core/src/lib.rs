//! PMSD Core Library
//!
//! This crate provides the shared data structures and error taxonomy for the
//! PMSD (Particulate Matter Sensor Driver) system.

pub mod error;
pub mod measurement;
pub mod serial;

// 导出错误类型
pub use error::DriverError;

// 导出测量记录与串口配置，便于其他模块使用
pub use measurement::Measurement;
pub use serial::{Parity, SerialConfig};
