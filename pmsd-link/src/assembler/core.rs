//! 帧组装器核心实现
//!
//! 逐字节驱动的帧捕获状态机：识别帧起始标志、累积字节、
//! 在帧满时执行长度与校验和检查

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};

use super::checksum::sum_checksum;

/// 帧总长度（字节）
pub const FRAME_LENGTH: usize = 32;

/// 帧起始标志字节
pub const MARKER_FIRST: u8 = 0x42;

/// 帧第二标志字节
pub const MARKER_SECOND: u8 = 0x4D;

/// 载荷长度字段的期望值（字节2-3，大端）
pub const EXPECTED_PAYLOAD_LENGTH: u16 = 28;

/// 校验和覆盖的字节数（帧的前30字节）
pub const CHECKSUM_COVERAGE: usize = 30;

/// 帧组装器
///
/// 从字节流中捕获并验证完整帧。每次调用`feed`消费一个字节，
/// 帧满且通过全部检查时返回32字节的帧快照。
///
/// 组装器假定单一执行上下文独占驱动（典型为接收中断），
/// 内部不加锁；宿主若存在中断嵌套或多核访问需自行串行化。
pub struct FrameAssembler {
    /// 帧缓冲区（固定容量，越界写入被拒绝而不是回绕）
    buffer: [u8; FRAME_LENGTH],
    /// 当前写偏移（0..=FRAME_LENGTH）
    offset: usize,
    /// 捕获有效标志
    in_valid_packet: bool,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// 创建新的帧组装器
    pub fn new() -> Self {
        Self {
            buffer: [0u8; FRAME_LENGTH],
            offset: 0,
            in_valid_packet: false,
        }
    }

    /// 消费一个字节，推进捕获状态
    ///
    /// # 参数
    /// - `byte`: 接收到的原始字节
    /// - `diagnostics`: 诊断事件接收端（事件被推迟处理，本调用内不做格式化）
    ///
    /// # 返回
    /// - `Some(frame)`: 捕获到一个通过长度和校验和检查的完整帧
    /// - `None`: 尚未形成完整帧，或候选帧被丢弃
    pub fn feed(
        &mut self,
        byte: u8,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Option<[u8; FRAME_LENGTH]> {
        // 帧起始字节在任何位置出现都重新锚定捕获，
        // 半途的起始字节视为新帧的开始而不是旧帧内的数据
        if byte == MARKER_FIRST {
            diagnostics.post(DiagnosticEvent::FrameStart);
            self.buffer = [0u8; FRAME_LENGTH];
            self.offset = 0;
            self.in_valid_packet = true;
        }

        // 恰好捕获了一个字节时，下一个字节必须是第二标志，
        // 否则放弃本次捕获；偏移保持原值，等待下一个起始字节
        if self.offset == 1 && byte != MARKER_SECOND {
            diagnostics.post(DiagnosticEvent::InvalidSecondByte(byte));
            self.in_valid_packet = false;
        }

        if self.in_valid_packet && self.offset < FRAME_LENGTH {
            self.buffer[self.offset] = byte;
            self.offset += 1;

            // 完成检查只在偏移恰好推进到容量时触发，
            // 保证每个候选帧至多检查一次
            if self.offset == FRAME_LENGTH {
                return self.complete_candidate(diagnostics);
            }
        }

        None
    }

    /// 对刚填满的候选帧执行长度与校验和检查
    fn complete_candidate(
        &mut self,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Option<[u8; FRAME_LENGTH]> {
        let declared = u16::from_be_bytes([self.buffer[2], self.buffer[3]]);
        if declared != EXPECTED_PAYLOAD_LENGTH {
            diagnostics.post(DiagnosticEvent::LengthMismatch(declared));
            return None;
        }

        let expected = u16::from_be_bytes([
            self.buffer[CHECKSUM_COVERAGE],
            self.buffer[CHECKSUM_COVERAGE + 1],
        ]);
        let computed = sum_checksum(&self.buffer[..CHECKSUM_COVERAGE]);
        if computed != expected {
            diagnostics.post(DiagnosticEvent::ChecksumMismatch { computed, expected });
            return None;
        }

        Some(self.buffer)
    }

    /// 获取当前写偏移
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 检查捕获是否处于有效状态
    pub fn is_capturing(&self) -> bool {
        self.in_valid_packet
    }
}
