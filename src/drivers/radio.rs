// 无线发送端（Transport 实现）
//
// send 只把帧放进发送队列立即返回，由 radio_tx_task 写到串口
use button_node::{PeerAddress, Transport, TransportError, WIRE_LEN};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// 发送队列深度
pub const OUTBOUND_QUEUE_DEPTH: usize = 8;

/// 待发送的帧
#[derive(Clone, Copy, defmt::Format)]
pub struct OutboundFrame {
    pub peer: PeerAddress,
    pub frame: [u8; WIRE_LEN],
}

pub type OutboundChannel = Channel<CriticalSectionRawMutex, OutboundFrame, OUTBOUND_QUEUE_DEPTH>;
pub type OutboundReceiver =
    Receiver<'static, CriticalSectionRawMutex, OutboundFrame, OUTBOUND_QUEUE_DEPTH>;

/// 发送队列
pub static OUTBOUND: OutboundChannel = Channel::new();

/// 无线链路发送端
pub struct RadioLink {
    queue: Sender<'static, CriticalSectionRawMutex, OutboundFrame, OUTBOUND_QUEUE_DEPTH>,
}

impl RadioLink {
    pub fn new() -> Self {
        Self {
            queue: OUTBOUND.sender(),
        }
    }
}

impl Transport for RadioLink {
    fn send(&mut self, peer: &PeerAddress, frame: &[u8; WIRE_LEN]) -> Result<(), TransportError> {
        self.queue
            .try_send(OutboundFrame {
                peer: *peer,
                frame: *frame,
            })
            .map_err(|_| TransportError::QueueFull)
    }
}

impl Default for RadioLink {
    fn default() -> Self {
        Self::new()
    }
}
