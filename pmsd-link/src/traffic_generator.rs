//! 流量生成模块
//!
//! 生成符合线路格式的传感器输出字节流，用于测试与演示。
//! 支持可重复的种子随机生成、帧间噪声和受控的帧损坏。

use pmsd_core::{DriverError, Measurement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assembler::{
    sum_checksum, CHECKSUM_COVERAGE, EXPECTED_PAYLOAD_LENGTH, FRAME_LENGTH, MARKER_FIRST,
    MARKER_SECOND,
};
use crate::decoder::field_offset;

/// 在帧内指定偏移处写入16位大端值
fn write_u16_be(frame: &mut [u8; FRAME_LENGTH], offset: usize, value: u16) {
    let bytes = value.to_be_bytes();
    frame[offset] = bytes[0];
    frame[offset + 1] = bytes[1];
}

/// 重新计算并写入帧尾校验和
fn refresh_checksum(frame: &mut [u8; FRAME_LENGTH]) {
    let checksum = sum_checksum(&frame[..CHECKSUM_COVERAGE]);
    write_u16_be(frame, CHECKSUM_COVERAGE, checksum);
}

/// 帧构造器
///
/// 从一条测量记录构造带正确标志、长度字段与校验和的完整帧
pub struct FrameBuilder {
    measurement: Measurement,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// 创建全零测量记录的帧构造器
    pub fn new() -> Self {
        Self {
            measurement: Measurement::default(),
        }
    }

    /// 从指定测量记录创建帧构造器
    pub fn from_measurement(measurement: Measurement) -> Self {
        Self { measurement }
    }

    /// 构造完整的32字节帧
    pub fn build(&self) -> [u8; FRAME_LENGTH] {
        let m = &self.measurement;
        let mut frame = [0u8; FRAME_LENGTH];

        frame[0] = MARKER_FIRST;
        frame[1] = MARKER_SECOND;
        write_u16_be(&mut frame, 2, EXPECTED_PAYLOAD_LENGTH);

        write_u16_be(&mut frame, field_offset::PM10_STANDARD, m.pm10_standard);
        write_u16_be(&mut frame, field_offset::PM25_STANDARD, m.pm25_standard);
        write_u16_be(&mut frame, field_offset::PM100_STANDARD, m.pm100_standard);
        write_u16_be(&mut frame, field_offset::PM10_ENV, m.pm10_env);
        write_u16_be(&mut frame, field_offset::PM25_ENV, m.pm25_env);
        write_u16_be(&mut frame, field_offset::PM100_ENV, m.pm100_env);
        write_u16_be(&mut frame, field_offset::PARTICLES_03UM, m.particles_03um);
        write_u16_be(&mut frame, field_offset::PARTICLES_05UM, m.particles_05um);
        write_u16_be(&mut frame, field_offset::PARTICLES_10UM, m.particles_10um);
        write_u16_be(&mut frame, field_offset::PARTICLES_25UM, m.particles_25um);
        write_u16_be(&mut frame, field_offset::PARTICLES_50UM, m.particles_50um);
        write_u16_be(&mut frame, field_offset::PARTICLES_100UM, m.particles_100um);

        // 字节28-29为保留字段，置零
        refresh_checksum(&mut frame);
        frame
    }
}

/// 流量配置
#[derive(Debug, Clone)]
pub struct TrafficConfig {
    /// 生成的帧数
    pub frame_count: usize,
    /// 帧间噪声字节数上限（0表示帧之间无噪声）
    pub max_gap_noise: usize,
    /// 每隔多少帧损坏一帧的校验和（0表示不损坏）
    pub corrupt_every: usize,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            frame_count: 10,
            max_gap_noise: 8,
            corrupt_every: 0,
        }
    }
}

/// 流量生成器
///
/// 生成模拟传感器输出的字节流
///
/// # 示例
/// ```
/// use pmsd_link::traffic_generator::{TrafficConfig, TrafficGenerator};
///
/// let mut generator = TrafficGenerator::with_seed(TrafficConfig::default(), 7);
/// let stream = generator.generate_stream();
/// assert!(!stream.is_empty());
/// ```
pub struct TrafficGenerator {
    config: TrafficConfig,
    rng: StdRng,
    frames_generated: u64,
}

impl TrafficGenerator {
    /// 创建新的流量生成器
    pub fn new(config: TrafficConfig) -> Self {
        // 使用当前时间作为种子
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::with_seed(config, seed)
    }

    /// 使用指定种子创建（用于可重复测试）
    pub fn with_seed(config: TrafficConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            frames_generated: 0,
        }
    }

    /// 生成一条随机测量记录
    pub fn next_measurement(&mut self) -> Measurement {
        let mut payload = [0u8; 24];
        self.rng.fill_bytes(&mut payload);

        let field = |i: usize| u16::from_be_bytes([payload[i * 2], payload[i * 2 + 1]]);
        Measurement {
            pm10_standard: field(0),
            pm25_standard: field(1),
            pm100_standard: field(2),
            pm10_env: field(3),
            pm25_env: field(4),
            pm100_env: field(5),
            particles_03um: field(6),
            particles_05um: field(7),
            particles_10um: field(8),
            particles_25um: field(9),
            particles_50um: field(10),
            particles_100um: field(11),
        }
    }

    /// 生成一个完整帧
    pub fn next_frame(&mut self) -> [u8; FRAME_LENGTH] {
        self.frames_generated += 1;
        FrameBuilder::from_measurement(self.next_measurement()).build()
    }

    /// 按配置生成字节流：帧、帧间噪声以及受控的损坏帧
    pub fn generate_stream(&mut self) -> Vec<u8> {
        let mut stream = Vec::new();

        for i in 0..self.config.frame_count {
            if self.config.max_gap_noise > 0 {
                let noise_len = (self.rng.next_u32() as usize) % (self.config.max_gap_noise + 1);
                let mut noise = vec![0u8; noise_len];
                self.rng.fill_bytes(&mut noise);
                stream.extend_from_slice(&noise);
            }

            let mut frame = self.next_frame();
            if self.config.corrupt_every > 0 && (i + 1) % self.config.corrupt_every == 0 {
                Self::corrupt_checksum(&mut frame);
            }
            stream.extend_from_slice(&frame);
        }

        stream
    }

    /// 损坏帧尾校验和（用于负向测试）
    pub fn corrupt_checksum(frame: &mut [u8; FRAME_LENGTH]) {
        frame[FRAME_LENGTH - 1] = frame[FRAME_LENGTH - 1].wrapping_add(1);
    }

    /// 把长度字段改为非法值并重算校验和，
    /// 使候选帧只触发长度检查失败（用于负向测试）
    pub fn corrupt_length(frame: &mut [u8; FRAME_LENGTH]) {
        write_u16_be(frame, 2, EXPECTED_PAYLOAD_LENGTH + 2);
        refresh_checksum(frame);
    }

    /// 获取已生成的帧数
    pub fn frames_generated(&self) -> u64 {
        self.frames_generated
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &TrafficConfig {
        &self.config
    }
}

/// 校验一个帧是否符合线路格式（标志、长度字段、校验和）
pub fn validate_frame(frame: &[u8; FRAME_LENGTH]) -> Result<(), DriverError> {
    if frame[0] != MARKER_FIRST || frame[1] != MARKER_SECOND {
        return Err(DriverError::SynchronizationError(format!(
            "Bad frame markers: {:02X} {:02X}",
            frame[0], frame[1]
        )));
    }

    let declared = u16::from_be_bytes([frame[2], frame[3]]);
    if declared != EXPECTED_PAYLOAD_LENGTH {
        return Err(DriverError::LengthError(format!(
            "Declared payload length {} (expected {})",
            declared, EXPECTED_PAYLOAD_LENGTH
        )));
    }

    let expected = u16::from_be_bytes([frame[CHECKSUM_COVERAGE], frame[CHECKSUM_COVERAGE + 1]]);
    crate::assembler::verify_sum_checksum(&frame[..CHECKSUM_COVERAGE], expected)
}

/// 从Base64编码的抓包数据导入字节流
///
/// # 参数
/// - `encoded`: Base64编码字符串
///
/// # 返回
/// - `Ok(Vec<u8>)`: 解码后的字节流
/// - `Err(DriverError)`: 解码失败
pub fn import_capture_from_base64(encoded: &str) -> Result<Vec<u8>, DriverError> {
    use base64::{engine::general_purpose::STANDARD, Engine};

    STANDARD
        .decode(encoded)
        .map_err(|e| DriverError::ImportError(format!("Invalid base64 capture: {e}")))
}
