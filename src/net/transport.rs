// 无线传输层接口（ESP-NOW 风格：固定对端，定长帧）
use crate::telemetry::WIRE_LEN;

/// 6 字节无线地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress(pub [u8; 6]);

impl PeerAddress {
    /// 广播地址（全 1），代替对端发现
    pub const BROADCAST: PeerAddress = PeerAddress([0xFF; 6]);

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

/// 发送结果（由传输层异步回报，与具体事件无关联）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryStatus {
    Success,
    Failure,
}

impl DeliveryStatus {
    /// 模块回报的状态字节，0 表示成功
    pub fn from_u8(value: u8) -> Self {
        if value == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// 传输层拒绝发送的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// 发送队列已满
    QueueFull,
    /// 帧超过链路允许长度
    FrameTooLarge,
}

/// 传输层
///
/// `send` 只负责入队并立即返回，不能阻塞等待确认；
/// 投递结果通过 [`DeliveryStatus`] 另行回报。
pub trait Transport {
    fn send(&mut self, peer: &PeerAddress, frame: &[u8; WIRE_LEN]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, peer: &PeerAddress, frame: &[u8; WIRE_LEN]) -> Result<(), TransportError> {
        (**self).send(peer, frame)
    }
}
