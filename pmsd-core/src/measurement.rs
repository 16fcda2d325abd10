//! 测量记录定义
//!
//! 传感器单帧解码后的结构化输出

use serde::{Deserialize, Serialize};

/// 颗粒物测量记录
///
/// 一帧有效数据解码后的十二个16位字段：三种粒径的标准颗粒物浓度、
/// 三种粒径的环境颗粒物浓度，以及六个粒径阈值的颗粒计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// PM1.0标准浓度 [µg/m³]
    pub pm10_standard: u16,
    /// PM2.5标准浓度 [µg/m³]
    pub pm25_standard: u16,
    /// PM10标准浓度 [µg/m³]
    pub pm100_standard: u16,
    /// PM1.0环境浓度 [µg/m³]
    pub pm10_env: u16,
    /// PM2.5环境浓度 [µg/m³]
    pub pm25_env: u16,
    /// PM10环境浓度 [µg/m³]
    pub pm100_env: u16,
    /// 粒径≥0.3µm的颗粒数（每0.1L空气）
    pub particles_03um: u16,
    /// 粒径≥0.5µm的颗粒数（每0.1L空气）
    pub particles_05um: u16,
    /// 粒径≥1.0µm的颗粒数（每0.1L空气）
    pub particles_10um: u16,
    /// 粒径≥2.5µm的颗粒数（每0.1L空气）
    pub particles_25um: u16,
    /// 粒径≥5.0µm的颗粒数（每0.1L空气）
    pub particles_50um: u16,
    /// 粒径≥10.0µm的颗粒数（每0.1L空气）
    pub particles_100um: u16,
}
