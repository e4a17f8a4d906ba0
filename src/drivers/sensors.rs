// ADC 传感器驱动（电池分压 + 光敏电阻）
use button_node::Sensors;
use button_node::sensor::adc_to_volts;
use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::peripherals::ADC1;

/// 板载模拟量
pub struct AdcSensors {
    adc: Adc<'static, ADC1>,
    battery_pin: AnyAdcChannel<ADC1>,
    photocell_pin: AnyAdcChannel<ADC1>,
    vref: f32,
    divider: f32,
}

impl AdcSensors {
    pub fn new(
        adc: Adc<'static, ADC1>,
        battery_pin: AnyAdcChannel<ADC1>,
        photocell_pin: AnyAdcChannel<ADC1>,
        vref: f32,
        divider: f32,
    ) -> Self {
        Self {
            adc,
            battery_pin,
            photocell_pin,
            vref,
            divider,
        }
    }
}

impl Sensors for AdcSensors {
    fn battery_voltage(&mut self) -> f32 {
        let raw = self.adc.blocking_read(&mut self.battery_pin);
        adc_to_volts(raw, self.vref, self.divider)
    }

    fn light_level(&mut self) -> f32 {
        // 与对端约定：光照直接上报原始 ADC 值
        self.adc.blocking_read(&mut self.photocell_pin) as f32
    }
}
