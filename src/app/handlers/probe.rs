// 入站帧处理（连接检查）
use crate::app::engine::{DiscardReason, MessageOutcome, ProtocolEngine};
use crate::error::NodeError;
use crate::net::{PeerAddress, Transport};
use crate::sensor::Sensors;
use crate::telemetry::{TelemetryMessage, WIRE_LEN};

impl<T: Transport, S: Sensors> ProtocolEngine<T, S> {
    /// 处理对端发来的帧
    ///
    /// 长度不对直接丢弃（不发送）；`check_connection` 为真时回复状态，
    /// 其余帧在本节点的角色下没有意义，静默忽略
    pub fn on_message(&mut self, sender: &PeerAddress, bytes: &[u8]) -> MessageOutcome {
        info!("Bytes received: {}", bytes.len());

        // from_bytes 只校验长度，不读字段
        let incoming = match TelemetryMessage::from_bytes(bytes) {
            Ok(message) => message,
            Err(e) => {
                self.stats.malformed += 1;
                warn!("Malformed frame: {} bytes, expected {}", bytes.len(), WIRE_LEN);
                return MessageOutcome::Discarded(DiscardReason::Malformed(NodeError::from(e)));
            }
        };

        if !self.config.probe_filter.accepts(sender, &self.config.peer) {
            self.stats.ignored += 1;
            warn!("Frame from unknown sender {:?}", sender);
            return MessageOutcome::Discarded(DiscardReason::UnknownSender(*sender));
        }

        if !incoming.check_connection {
            self.stats.ignored += 1;
            debug!("Frame without check_connection ignored");
            return MessageOutcome::Ignored;
        }

        info!("DATA: Check connection");

        let reply = self.build_status_reply();

        match self.push(&reply) {
            Ok(()) => {
                self.stats.probes_answered += 1;
                debug!("Status reply sent (light: {})", reply.light_level);
                MessageOutcome::Replied(reply)
            }
            Err(e) => {
                warn!("Status reply lost: {:?}", e);
                MessageOutcome::ReplyFailed(e)
            }
        }
    }
}
