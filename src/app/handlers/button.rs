// 按键事件处理
use crate::app::engine::{ProtocolEngine, TriggerOutcome};
use crate::app::gate::GateDecision;
use crate::net::Transport;
use crate::sensor::Sensors;
use embassy_time::Instant;

impl<T: Transport, S: Sensors> ProtocolEngine<T, S> {
    /// 处理一次上升沿：先去抖，再推送事件
    pub fn on_button_edge(&mut self, now: Instant) -> TriggerOutcome {
        match self.gate.evaluate(now) {
            GateDecision::Accepted => {
                debug!("INTERRUPT at {} ms", now.as_millis());
                self.on_button_event()
            }
            GateDecision::Suppressed => {
                self.stats.edges_suppressed += 1;
                debug!("CHILL: edge at {} ms debounced", now.as_millis());
                TriggerOutcome::Suppressed
            }
        }
    }

    /// 推送按键事件
    ///
    /// 读取光照、构造事件消息并发送；发送失败只记录，不重试
    pub fn on_button_event(&mut self) -> TriggerOutcome {
        self.stats.triggers_accepted += 1;

        let light_level = self.sensors.light_level();
        self.last_light_level = light_level;

        let message = self.build_event_message(light_level);

        match self.push(&message) {
            Ok(()) => {
                info!(
                    "Button event sent (battery: {} %, light: {})",
                    message.battery_percent, message.light_level
                );
                TriggerOutcome::Sent(message)
            }
            Err(e) => {
                warn!("Button event lost: {:?}", e);
                TriggerOutcome::SendFailed(e)
            }
        }
    }
}
