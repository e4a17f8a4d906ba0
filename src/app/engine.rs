// 协议引擎：按键事件推送 + 连接检查应答
use super::gate::TriggerGate;
use crate::config::NodeConfig;
use crate::error::{NodeError, Result};
use crate::net::{PeerAddress, Transport};
use crate::sensor::Sensors;
use crate::telemetry::{BatteryCurve, CalibrationPoint, TelemetryMessage};

/// 运行计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeStats {
    /// 被接受的按键
    pub triggers_accepted: u32,
    /// 被去抖抑制的边沿
    pub edges_suppressed: u32,
    /// 成功入队的帧
    pub frames_sent: u32,
    /// 被传输层拒绝的帧
    pub send_rejected: u32,
    /// 投递成功回报
    pub delivered: u32,
    /// 投递失败回报
    pub delivery_failed: u32,
    /// 已应答的连接检查
    pub probes_answered: u32,
    /// 长度不对的入站帧
    pub malformed: u32,
    /// 被忽略的入站帧
    pub ignored: u32,
}

/// 按键处理结果
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// 已入队发送
    Sent(TelemetryMessage),
    /// 去抖抑制
    Suppressed,
    /// 传输层拒绝，事件丢失
    SendFailed(NodeError),
}

/// 丢弃入站帧的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscardReason {
    /// 长度不等于线格式长度（`NodeError::MalformedReceive`）
    Malformed(NodeError),
    /// 发送方不是配置的对端
    UnknownSender(PeerAddress),
}

/// 入站帧处理结果
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageOutcome {
    /// 已回复状态
    Replied(TelemetryMessage),
    /// 回复被传输层拒绝
    ReplyFailed(NodeError),
    /// 非连接检查，无动作
    Ignored,
    /// 未解码直接丢弃
    Discarded(DiscardReason),
}

/// 协议引擎
///
/// 节点唯一的可变状态都在这里：去抖时间戳、最近一次光照读数、计数。
/// 所有入口由同一个任务串行调用，不需要锁。
pub struct ProtocolEngine<T: Transport, S: Sensors> {
    pub(super) transport: T,
    pub(super) sensors: S,
    pub(super) gate: TriggerGate,
    pub(super) curve: BatteryCurve,
    pub(super) config: NodeConfig,
    pub(super) last_light_level: f32,
    pub(super) stats: NodeStats,
}

impl<T: Transport, S: Sensors> ProtocolEngine<T, S> {
    /// 使用默认电池曲线创建引擎
    pub fn new(transport: T, sensors: S, config: NodeConfig) -> Self {
        Self::with_curve(transport, sensors, config, BatteryCurve::DEFAULT)
    }

    /// 使用自定义标定表创建引擎（换电芯时用），标定表无效返回 `InvalidCurve`
    pub fn with_calibration(
        transport: T,
        sensors: S,
        config: NodeConfig,
        points: &'static [CalibrationPoint],
    ) -> Result<Self> {
        let curve = BatteryCurve::new(points)?;
        Ok(Self::with_curve(transport, sensors, config, curve))
    }

    pub fn with_curve(transport: T, sensors: S, config: NodeConfig, curve: BatteryCurve) -> Self {
        Self {
            transport,
            sensors,
            gate: TriggerGate::new(config.min_trigger_interval),
            curve: curve.with_out_of_range(config.battery_out_of_range),
            config,
            last_light_level: 0.0,
            stats: NodeStats::default(),
        }
    }

    /// 采样电池电压并估算电量
    pub fn battery_percent(&mut self) -> f32 {
        let volts = self.sensors.battery_voltage();
        self.curve.estimate(volts)
    }

    /// 构造按键事件消息（重新采样电池）
    pub fn build_event_message(&mut self, light_level: f32) -> TelemetryMessage {
        TelemetryMessage::button_event(self.battery_percent(), light_level)
    }

    /// 构造状态应答（重新采样电池，光照取最近一次读数）
    pub fn build_status_reply(&mut self) -> TelemetryMessage {
        TelemetryMessage::status_reply(self.battery_percent(), self.last_light_level)
    }

    /// 编码并发往对端；只入队，不等待投递结果
    pub(super) fn push(&mut self, message: &TelemetryMessage) -> Result<()> {
        let peer = self.config.peer;
        let sent = self.transport.send(&peer, &message.to_bytes());
        if sent.is_err() {
            self.stats.send_rejected += 1;
        }
        sent?;

        self.stats.frames_sent += 1;
        Ok(())
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub fn last_light_level(&self) -> f32 {
        self.last_light_level
    }

    pub fn gate(&self) -> &TriggerGate {
        &self.gate
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }
}
