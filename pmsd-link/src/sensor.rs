//! 传感器会话控制
//!
//! 驱动电源与复位控制线，管理回调注册，并把接收中断交付的字节
//! 送入帧组装器。组装、解码与回调调用都在交付字节的调用栈上
//! 同步完成，不引入内部并发。

use pmsd_core::{Measurement, SerialConfig};

use crate::assembler::FrameAssembler;
use crate::decoder::decode;
use crate::diagnostics::DiagnosticSink;

/// 数字输出控制线抽象
///
/// 实现者对接真实的GPIO；电平切换所需的保持时间由实现者负责
pub trait ControlLine: Send {
    /// 拉高
    fn set_high(&mut self);
    /// 拉低
    fn set_low(&mut self);
}

/// 颗粒物传感器驱动
///
/// 持有电源线、复位线、帧组装器和消费者回调。
/// 字节交付入口假定单一执行上下文独占调用（典型为接收中断），
/// `disable`与进行中的字节交付并发调用时由宿主负责串行化。
pub struct Pms5003 {
    power: Box<dyn ControlLine>,
    reset: Box<dyn ControlLine>,
    serial_config: SerialConfig,
    assembler: FrameAssembler,
    diagnostics: Box<dyn DiagnosticSink>,
    callback: Option<Box<dyn FnMut(Measurement) + Send>>,
    enabled: bool,
}

impl Pms5003 {
    /// 创建驱动实例
    ///
    /// 构造时拉低电源线（传感器保持关闭直到`enable`），
    /// 串口配置固定为传感器要求的9600 8N1
    pub fn new(
        power: Box<dyn ControlLine>,
        reset: Box<dyn ControlLine>,
        diagnostics: Box<dyn DiagnosticSink>,
    ) -> Self {
        Self::with_serial_config(power, reset, diagnostics, SerialConfig::default())
    }

    /// 使用指定串口配置创建驱动实例
    pub fn with_serial_config(
        mut power: Box<dyn ControlLine>,
        reset: Box<dyn ControlLine>,
        diagnostics: Box<dyn DiagnosticSink>,
        serial_config: SerialConfig,
    ) -> Self {
        power.set_low();

        Self {
            power,
            reset,
            serial_config,
            assembler: FrameAssembler::new(),
            diagnostics,
            callback: None,
            enabled: false,
        }
    }

    /// 启用传感器
    ///
    /// 拉高电源线并注册回调；此后交付的字节进入帧组装器，
    /// 每捕获一个有效帧回调被同步调用一次。
    ///
    /// 注意：启用期间接收路径必须保持对中断的响应，
    /// 宿主的深度睡眠在此期间应当关闭。
    pub fn enable<F>(&mut self, callback: F)
    where
        F: FnMut(Measurement) + Send + 'static,
    {
        self.power.set_high();
        self.callback = Some(Box::new(callback));
        self.enabled = true;
    }

    /// 停用传感器
    ///
    /// 拉低电源线，停止接收字节并清除回调。
    /// 停用前的半帧状态无需清理：重新启用后下一个帧起始字节
    /// 自然重置捕获。
    pub fn disable(&mut self) {
        self.power.set_low();
        self.callback = None;
        self.enabled = false;
    }

    /// 硬件复位
    ///
    /// 在复位线上产生一个低电平脉冲
    pub fn hardware_reset(&mut self) {
        self.reset.set_low();
        self.reset.set_high();
    }

    /// 获取宿主需要下发给串口外设的线路配置
    pub fn serial_config(&self) -> SerialConfig {
        self.serial_config
    }

    /// 检查传感器是否处于启用状态
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 交付一个接收到的字节（接收中断的单字节路径）
    ///
    /// 停用状态下字节被直接丢弃
    pub fn on_byte_received(&mut self, byte: u8) {
        if !self.enabled {
            return;
        }

        if let Some(frame) = self.assembler.feed(byte, self.diagnostics.as_mut()) {
            let measurement = decode(&frame);
            if let Some(callback) = self.callback.as_mut() {
                callback(measurement);
            }
        }
    }

    /// 交付一批接收到的字节（批量路径，保持到达顺序）
    pub fn on_bytes_received(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.on_byte_received(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;
    use crate::traffic_generator::FrameBuilder;
    use std::sync::mpsc;

    /// 把电平变化记录到通道的测试控制线
    struct RecordingLine {
        levels: mpsc::Sender<bool>,
    }

    impl ControlLine for RecordingLine {
        fn set_high(&mut self) {
            let _ = self.levels.send(true);
        }

        fn set_low(&mut self) {
            let _ = self.levels.send(false);
        }
    }

    fn recording_line() -> (Box<dyn ControlLine>, mpsc::Receiver<bool>) {
        let (tx, rx) = mpsc::channel();
        (Box::new(RecordingLine { levels: tx }), rx)
    }

    fn sensor_with_power_probe() -> (Pms5003, mpsc::Receiver<bool>) {
        let (power, power_rx) = recording_line();
        let (reset, _reset_rx) = recording_line();
        let sensor = Pms5003::new(power, reset, Box::new(NullDiagnostics));
        (sensor, power_rx)
    }

    #[test]
    fn test_power_line_low_on_construction() {
        let (_sensor, power_rx) = sensor_with_power_probe();
        assert_eq!(power_rx.try_recv(), Ok(false));
    }

    #[test]
    fn test_enable_disable_drive_power_line() {
        let (mut sensor, power_rx) = sensor_with_power_probe();
        power_rx.try_recv().expect("construction level");

        sensor.enable(|_| {});
        assert_eq!(power_rx.try_recv(), Ok(true));
        assert!(sensor.is_enabled());

        sensor.disable();
        assert_eq!(power_rx.try_recv(), Ok(false));
        assert!(!sensor.is_enabled());
    }

    #[test]
    fn test_hardware_reset_pulses_line() {
        let (power, _power_rx) = recording_line();
        let (reset, reset_rx) = recording_line();
        let mut sensor = Pms5003::new(power, reset, Box::new(NullDiagnostics));

        sensor.hardware_reset();
        assert_eq!(reset_rx.try_recv(), Ok(false));
        assert_eq!(reset_rx.try_recv(), Ok(true));
    }

    #[test]
    fn test_default_serial_config_is_9600_8n1() {
        let (sensor, _power_rx) = sensor_with_power_probe();
        assert_eq!(sensor.serial_config(), SerialConfig::default());
    }

    #[test]
    fn test_frame_delivery_invokes_callback_once() {
        let (mut sensor, _power_rx) = sensor_with_power_probe();
        let (records_tx, records_rx) = mpsc::channel();

        sensor.enable(move |m| {
            let _ = records_tx.send(m);
        });

        let frame = FrameBuilder::new().build();
        sensor.on_bytes_received(&frame);

        let records: Vec<Measurement> = records_rx.try_iter().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], Measurement::default());
    }

    #[test]
    fn test_bytes_dropped_while_disabled() {
        let (mut sensor, _power_rx) = sensor_with_power_probe();
        let (records_tx, records_rx) = mpsc::channel();

        let frame = FrameBuilder::new().build();

        // 未启用时完整有效帧也不产生回调
        sensor.on_bytes_received(&frame);
        assert_eq!(records_rx.try_iter().count(), 0);

        // 启用后恢复交付
        sensor.enable(move |m| {
            let _ = records_tx.send(m);
        });
        sensor.on_bytes_received(&frame);
        assert_eq!(records_rx.try_iter().count(), 1);
    }

    #[test]
    fn test_disable_clears_callback() {
        let (mut sensor, _power_rx) = sensor_with_power_probe();
        let (records_tx, records_rx) = mpsc::channel();

        sensor.enable(move |m| {
            let _ = records_tx.send(m);
        });
        sensor.disable();

        let frame = FrameBuilder::new().build();
        sensor.on_bytes_received(&frame);
        assert_eq!(records_rx.try_iter().count(), 0);
    }
}
