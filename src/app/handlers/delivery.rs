// 投递结果处理
use crate::app::engine::ProtocolEngine;
use crate::net::{DeliveryStatus, Transport};
use crate::sensor::Sensors;

impl<T: Transport, S: Sensors> ProtocolEngine<T, S> {
    /// 传输层回报的投递结果，只记录，不与具体事件关联
    pub fn on_delivery_status(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Success => {
                self.stats.delivered += 1;
                info!("Last Packet Send Status: Delivery success");
            }
            DeliveryStatus::Failure => {
                self.stats.delivery_failed += 1;
                warn!("Last Packet Send Status: Delivery fail");
            }
        }
    }
}
