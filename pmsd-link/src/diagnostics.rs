//! 诊断事件模块
//!
//! 接收路径上的异常不向消费者传播，而是作为诊断事件投递到注入的
//! 接收端。事件的投递必须廉价且不阻塞（典型场景在接收中断内），
//! 格式化与输出由宿主在中断上下文之外完成。

use std::fmt;
use std::sync::mpsc;

/// 诊断事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// 检测到帧起始字节，开始新的捕获
    FrameStart,
    /// 第二字节不是帧标志，捕获被放弃
    InvalidSecondByte(u8),
    /// 载荷长度字段不符，候选帧被丢弃
    LengthMismatch(u16),
    /// 校验和不符，候选帧被丢弃
    ChecksumMismatch { computed: u16, expected: u16 },
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::FrameStart => write!(f, "new frame"),
            DiagnosticEvent::InvalidSecondByte(byte) => {
                write!(f, "invalid second byte ({byte:02x})")
            }
            DiagnosticEvent::LengthMismatch(length) => {
                write!(f, "frame length not correct (was {length})")
            }
            DiagnosticEvent::ChecksumMismatch { computed, expected } => {
                write!(
                    f,
                    "checksum not correct (was {computed}, but expected {expected})"
                )
            }
        }
    }
}

/// 诊断事件接收端
///
/// 延迟调用设施的抽象：组装器只负责投递事件，
/// 不依赖任何具体的执行或线程设施
pub trait DiagnosticSink: Send {
    /// 投递一个诊断事件
    fn post(&mut self, event: DiagnosticEvent);
}

/// 丢弃全部事件的接收端
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn post(&mut self, _event: DiagnosticEvent) {}
}

/// 队列式接收端：事件入队，由宿主在低优先级上下文排空
impl DiagnosticSink for mpsc::Sender<DiagnosticEvent> {
    fn post(&mut self, event: DiagnosticEvent) {
        // 接收端关闭说明宿主已停止排空，事件直接丢弃
        let _ = self.send(event);
    }
}
