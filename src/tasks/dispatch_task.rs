// 事件分发任务
use crate::drivers::{AdcSensors, RadioLink};
use button_node::event::EventReceiver;
use button_node::{ProtocolEngine, route_event};
use defmt::{debug, info};

/// 事件分发任务
///
/// 协议引擎只在这里被访问，事件按到达顺序串行处理
#[embassy_executor::task]
pub async fn dispatch_task(
    mut engine: ProtocolEngine<RadioLink, AdcSensors>,
    event_rx: EventReceiver,
) -> ! {
    info!("Dispatch task started");

    loop {
        let event = event_rx.receive().await;
        let routed = route_event(&mut engine, event);

        debug!("Dispatched: {:?}", routed);
        debug!("Stats: {:?}", engine.stats());
    }
}
