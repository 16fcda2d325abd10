//! 帧校验和
//!
//! 线路格式使用16位无符号字节累加和（模65536）

use pmsd_core::DriverError;

/// 计算16位累加校验和
pub fn sum_checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(byte as u16))
}

/// 验证16位累加校验和
///
/// # 参数
/// - `data`: 校验和覆盖的数据区域
/// - `expected`: 期望的校验和值
///
/// # 返回
/// - `Ok(())`: 校验通过
/// - `Err(DriverError)`: 校验失败
pub fn verify_sum_checksum(data: &[u8], expected: u16) -> Result<(), DriverError> {
    let computed = sum_checksum(data);
    if computed != expected {
        return Err(DriverError::ChecksumError(format!(
            "Checksum mismatch: expected {}, got {}",
            expected, computed
        )));
    }
    Ok(())
}
