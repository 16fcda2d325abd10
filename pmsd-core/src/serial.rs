//! 串口线路配置
//!
//! 描述UART链路的线路参数，初始化时一次性下发给宿主的串口外设

use serde::{Deserialize, Serialize};

/// 校验位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// 串口配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// 波特率
    pub baud_rate: u32,
    /// 数据位
    pub data_bits: u8,
    /// 校验位
    pub parity: Parity,
    /// 停止位
    pub stop_bits: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        // 传感器固定使用9600 8N1
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
        }
    }
}
