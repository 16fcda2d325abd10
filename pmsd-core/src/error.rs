//! 驱动错误定义

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// 同步错误
    SynchronizationError(String),
    /// 长度错误
    LengthError(String),
    /// 校验错误
    ChecksumError(String),
    /// 导入错误
    ImportError(String),
    /// 其他错误
    Other(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::SynchronizationError(msg) => {
                write!(f, "Synchronization error: {msg}")
            }
            DriverError::LengthError(msg) => write!(f, "Length error: {msg}"),
            DriverError::ChecksumError(msg) => write!(f, "Checksum error: {msg}"),
            DriverError::ImportError(msg) => write!(f, "Import error: {msg}"),
            DriverError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<String> for DriverError {
    fn from(s: String) -> Self {
        DriverError::Other(s)
    }
}

impl From<&str> for DriverError {
    fn from(s: &str) -> Self {
        DriverError::Other(s.to_string())
    }
}
