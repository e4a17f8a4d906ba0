// 遥测消息（与对端结构逐字节一致的线格式）
use byteorder::{ByteOrder, LittleEndian};

/// 线格式长度：2 × bool + 4 × f32，紧凑排列
pub const WIRE_LEN: usize = 18;

const OFFSET_BUTTON: usize = 0;
const OFFSET_CHECK: usize = 1;
const OFFSET_BATTERY: usize = 2;
const OFFSET_LIGHT: usize = 6;
const OFFSET_TEMPERATURE: usize = 10;
const OFFSET_HUMIDITY: usize = 14;

/// 线格式错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// 长度不等于 WIRE_LEN
    Length { expected: usize, actual: usize },
}

/// 遥测消息
///
/// 字段顺序和宽度就是线格式，任何改动都会破坏与对端的互通。
/// `temperature` / `humidity` 本节点未接传感器，恒为 0。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryMessage {
    pub button_pressed: bool,
    pub check_connection: bool,
    pub battery_percent: f32,
    pub light_level: f32,
    pub temperature: f32,
    pub humidity: f32,
}

impl TelemetryMessage {
    /// 按键事件消息
    pub fn button_event(battery_percent: f32, light_level: f32) -> Self {
        Self {
            button_pressed: true,
            check_connection: false,
            battery_percent,
            light_level,
            ..Self::default()
        }
    }

    /// 连接检查的状态应答
    pub fn status_reply(battery_percent: f32, light_level: f32) -> Self {
        Self {
            button_pressed: false,
            check_connection: true,
            battery_percent,
            light_level,
            ..Self::default()
        }
    }

    /// 编码为线格式
    pub fn to_bytes(&self) -> [u8; WIRE_LEN] {
        let mut bytes = [0u8; WIRE_LEN];
        bytes[OFFSET_BUTTON] = self.button_pressed as u8;
        bytes[OFFSET_CHECK] = self.check_connection as u8;
        LittleEndian::write_f32(&mut bytes[OFFSET_BATTERY..OFFSET_LIGHT], self.battery_percent);
        LittleEndian::write_f32(&mut bytes[OFFSET_LIGHT..OFFSET_TEMPERATURE], self.light_level);
        LittleEndian::write_f32(&mut bytes[OFFSET_TEMPERATURE..OFFSET_HUMIDITY], self.temperature);
        LittleEndian::write_f32(&mut bytes[OFFSET_HUMIDITY..WIRE_LEN], self.humidity);
        bytes
    }

    /// 从线格式解码
    ///
    /// 长度必须恰好为 WIRE_LEN；bool 字段非零即真（与 C 端 memcpy 语义一致）
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != WIRE_LEN {
            return Err(WireError::Length {
                expected: WIRE_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            button_pressed: bytes[OFFSET_BUTTON] != 0,
            check_connection: bytes[OFFSET_CHECK] != 0,
            battery_percent: LittleEndian::read_f32(&bytes[OFFSET_BATTERY..OFFSET_LIGHT]),
            light_level: LittleEndian::read_f32(&bytes[OFFSET_LIGHT..OFFSET_TEMPERATURE]),
            temperature: LittleEndian::read_f32(&bytes[OFFSET_TEMPERATURE..OFFSET_HUMIDITY]),
            humidity: LittleEndian::read_f32(&bytes[OFFSET_HUMIDITY..WIRE_LEN]),
        })
    }
}
