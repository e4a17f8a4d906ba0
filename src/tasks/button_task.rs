// 按键边沿任务
use button_node::event::{Event, EventSender};
use defmt::{debug, info, warn};
use embassy_stm32::exti::ExtiInput;
use embassy_time::Instant;

/// 按键任务
///
/// 只记录上升沿时间戳并投递事件，去抖和发送都在 dispatch_task 中完成，
/// 中断路径上不做任何阻塞操作
#[embassy_executor::task]
pub async fn button_task(mut button: ExtiInput<'static>, event_tx: EventSender) -> ! {
    info!("Button task started");

    loop {
        button.wait_for_rising_edge().await;
        let at = Instant::now();

        debug!("Button edge at {} ms", at.as_millis());

        if event_tx.try_send(Event::ButtonEdge { at }).is_err() {
            warn!("Event queue full, button edge dropped");
        }
    }
}
