// 传感器接口

/// 12 位 ADC 满量程
pub const ADC_MAX: u16 = 4095;

/// 节点的模拟量读数
pub trait Sensors {
    /// 电池电压（V）
    fn battery_voltage(&mut self) -> f32;

    /// 光敏电阻原始读数
    fn light_level(&mut self) -> f32;
}

/// ADC 原始值 → 电压
///
/// `divider` 为分压比（电池电压 / 引脚电压）
pub fn adc_to_volts(raw: u16, vref: f32, divider: f32) -> f32 {
    let raw = raw.min(ADC_MAX);
    raw as f32 / ADC_MAX as f32 * vref * divider
}
