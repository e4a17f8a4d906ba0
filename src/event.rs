// 事件系统
//
// 中断/接收侧只负责产生事件，所有处理都在 dispatch 任务中串行完成

use crate::net::packet::MAX_RADIO_FRAME;
use crate::net::{DeliveryStatus, PeerAddress, TransportError};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::Instant;
use heapless::Vec;

/// 事件队列深度
pub const EVENT_QUEUE_DEPTH: usize = 16;

pub type EventChannel = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;
pub type EventSender = Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;
pub type EventReceiver = Receiver<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// 系统事件
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// 按键上升沿（只带时间戳，去抖在处理侧完成）
    ButtonEdge { at: Instant },

    /// 收到无线帧（长度未校验）
    RadioFrame {
        sender: PeerAddress,
        payload: Vec<u8, MAX_RADIO_FRAME>,
    },

    /// 传输层回报的投递结果
    Delivery(DeliveryStatus),
}

impl Event {
    /// 从原始字节构造接收事件
    pub fn radio_frame(sender: PeerAddress, bytes: &[u8]) -> Result<Self, TransportError> {
        let payload = Vec::from_slice(bytes).map_err(|_| TransportError::FrameTooLarge)?;
        Ok(Event::RadioFrame { sender, payload })
    }

    /// 帧在串口链路上丢失（模块没收到），等同于一次投递失败
    pub fn link_failure() -> Self {
        Event::Delivery(DeliveryStatus::Failure)
    }
}
