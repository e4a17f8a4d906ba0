// 事件路由器
use crate::app::engine::{MessageOutcome, ProtocolEngine, TriggerOutcome};
use crate::event::Event;
use crate::net::Transport;
use crate::sensor::Sensors;

/// 路由结果
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routed {
    Trigger(TriggerOutcome),
    Message(MessageOutcome),
    Delivery,
}

/// 路由事件到对应的处理器
pub fn route_event<T: Transport, S: Sensors>(
    engine: &mut ProtocolEngine<T, S>,
    event: Event,
) -> Routed {
    match event {
        Event::ButtonEdge { at } => {
            debug!("Routing button edge");
            Routed::Trigger(engine.on_button_edge(at))
        }

        Event::RadioFrame { sender, payload } => {
            debug!("Routing radio frame: {} bytes", payload.len());
            Routed::Message(engine.on_message(&sender, &payload))
        }

        Event::Delivery(status) => {
            engine.on_delivery_status(status);
            Routed::Delivery
        }
    }
}
