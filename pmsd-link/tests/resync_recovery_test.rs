//! 重同步与恢复集成测试
//!
//! 验证帧起始字节的重新锚定、第二字节放弃、截断与损坏帧的恢复行为

use std::sync::mpsc;

use pmsd_core::Measurement;
use pmsd_link::diagnostics::DiagnosticEvent;
use pmsd_link::sensor::{ControlLine, Pms5003};
use pmsd_link::traffic_generator::{FrameBuilder, TrafficGenerator};

struct DisconnectedLine;

impl ControlLine for DisconnectedLine {
    fn set_high(&mut self) {}
    fn set_low(&mut self) {}
}

fn test_sensor() -> (
    Pms5003,
    mpsc::Receiver<Measurement>,
    mpsc::Receiver<DiagnosticEvent>,
) {
    let (diag_tx, diag_rx) = mpsc::channel();
    let (records_tx, records_rx) = mpsc::channel();

    let mut sensor = Pms5003::new(
        Box::new(DisconnectedLine),
        Box::new(DisconnectedLine),
        Box::new(diag_tx),
    );
    sensor.enable(move |m| {
        let _ = records_tx.send(m);
    });

    (sensor, records_rx, diag_rx)
}

fn sample_frame() -> [u8; 32] {
    FrameBuilder::from_measurement(Measurement {
        pm25_standard: 17,
        particles_05um: 260,
        ..Measurement::default()
    })
    .build()
}

#[test]
fn test_marker_mid_frame_reanchors_capture() {
    let (mut sensor, records_rx, _diag_rx) = test_sensor();

    // 半截帧后直接开始一个完整帧：帧起始字节重新锚定捕获
    sensor.on_bytes_received(&[0x42, 0x4D, 0x00, 0x1C, 0xAA, 0xBB]);
    sensor.on_bytes_received(&sample_frame());

    assert_eq!(records_rx.try_iter().count(), 1);
}

#[test]
fn test_abandoned_start_then_full_frame() {
    let (mut sensor, records_rx, _diag_rx) = test_sensor();

    // 起始字节后跟非标志字节：本次捕获被放弃，完整帧从第二个起始字节解出
    sensor.on_bytes_received(&[0x42, 0x00]);
    sensor.on_bytes_received(&sample_frame());

    assert_eq!(records_rx.try_iter().count(), 1);
}

#[test]
fn test_invalid_second_byte_is_diagnosed_and_recovered() {
    let (mut sensor, records_rx, diag_rx) = test_sensor();

    sensor.on_bytes_received(&[0x42, 0x99]);
    sensor.on_bytes_received(&sample_frame());

    assert_eq!(records_rx.try_iter().count(), 1);
    assert!(diag_rx
        .try_iter()
        .any(|e| e == DiagnosticEvent::InvalidSecondByte(0x99)));
}

#[test]
fn test_truncated_frame_produces_no_partial_record() {
    let frame = sample_frame();
    let (mut sensor, records_rx, _diag_rx) = test_sensor();

    // 只交付31字节：不产生任何回调
    sensor.on_bytes_received(&frame[..31]);
    assert_eq!(records_rx.try_iter().count(), 0);

    // 随后的完整帧正常解出
    sensor.on_bytes_received(&frame);
    assert_eq!(records_rx.try_iter().count(), 1);
}

#[test]
fn test_trailing_bytes_do_not_duplicate_delivery() {
    let (mut sensor, records_rx, _diag_rx) = test_sensor();

    sensor.on_bytes_received(&sample_frame());
    sensor.on_bytes_received(&[0u8; 64]);

    assert_eq!(records_rx.try_iter().count(), 1);
}

#[test]
fn test_length_violation_yields_zero_callbacks() {
    let mut frame = sample_frame();
    TrafficGenerator::corrupt_length(&mut frame);

    let (mut sensor, records_rx, diag_rx) = test_sensor();
    sensor.on_bytes_received(&frame);

    assert_eq!(records_rx.try_iter().count(), 0);
    assert!(diag_rx
        .try_iter()
        .any(|e| matches!(e, DiagnosticEvent::LengthMismatch(30))));
}

#[test]
fn test_checksum_violation_yields_zero_callbacks() {
    let mut frame = sample_frame();
    TrafficGenerator::corrupt_checksum(&mut frame);

    let (mut sensor, records_rx, diag_rx) = test_sensor();
    sensor.on_bytes_received(&frame);

    assert_eq!(records_rx.try_iter().count(), 0);
    assert!(diag_rx
        .try_iter()
        .any(|e| matches!(e, DiagnosticEvent::ChecksumMismatch { .. })));
}
