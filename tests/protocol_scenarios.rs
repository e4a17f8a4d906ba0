// 协议场景测试（宿主机运行，使用模拟传输层和传感器）
use button_node::app::{DiscardReason, MessageOutcome, Routed, TriggerOutcome};
use button_node::config::ProbeFilter;
use button_node::telemetry::{CalibrationPoint, CurveError};
use button_node::{
    DeliveryStatus, Event, NodeConfig, NodeError, PeerAddress, ProtocolEngine, Sensors,
    TelemetryMessage, Transport, TransportError, WIRE_LEN, route_event,
};
use embassy_time::Instant;

#[derive(Default)]
struct MockTransport {
    sent: Vec<(PeerAddress, [u8; WIRE_LEN])>,
    reject: Option<TransportError>,
}

impl Transport for MockTransport {
    fn send(&mut self, peer: &PeerAddress, frame: &[u8; WIRE_LEN]) -> Result<(), TransportError> {
        if let Some(e) = self.reject {
            return Err(e);
        }
        self.sent.push((*peer, *frame));
        Ok(())
    }
}

impl MockTransport {
    fn decoded(&self) -> Vec<TelemetryMessage> {
        self.sent
            .iter()
            .map(|(_, frame)| TelemetryMessage::from_bytes(frame).unwrap())
            .collect()
    }
}

struct MockSensors {
    volts: Vec<f32>,
    light: f32,
}

impl MockSensors {
    fn steady(volts: f32, light: f32) -> Self {
        Self {
            volts: vec![volts],
            light,
        }
    }
}

impl Sensors for MockSensors {
    // 依次返回预设电压，最后一个值保持不变
    fn battery_voltage(&mut self) -> f32 {
        if self.volts.len() > 1 {
            self.volts.remove(0)
        } else {
            self.volts[0]
        }
    }

    fn light_level(&mut self) -> f32 {
        self.light
    }
}

fn engine(volts: f32, light: f32) -> ProtocolEngine<MockTransport, MockSensors> {
    ProtocolEngine::new(
        MockTransport::default(),
        MockSensors::steady(volts, light),
        NodeConfig::default(),
    )
}

fn probe() -> [u8; WIRE_LEN] {
    TelemetryMessage {
        check_connection: true,
        ..TelemetryMessage::default()
    }
    .to_bytes()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn debounced_trigger_sequence() {
    let mut engine = engine(4.2, 640.0);

    let first = engine.on_button_edge(Instant::from_millis(0));
    match first {
        TriggerOutcome::Sent(msg) => {
            assert!(msg.button_pressed);
            assert!(!msg.check_connection);
            assert!(approx(msg.battery_percent, 100.0));
            assert_eq!(msg.light_level, 640.0);
            assert_eq!((msg.temperature, msg.humidity), (0.0, 0.0));
        }
        other => panic!("expected Sent, got {:?}", other),
    }
    assert_eq!(engine.transport().sent.len(), 1);

    assert_eq!(engine.on_button_edge(Instant::from_millis(1000)), TriggerOutcome::Suppressed);
    assert_eq!(engine.transport().sent.len(), 1);

    assert!(matches!(
        engine.on_button_edge(Instant::from_millis(3001)),
        TriggerOutcome::Sent(_)
    ));
    assert_eq!(engine.transport().sent.len(), 2);

    let stats = engine.stats();
    assert_eq!(stats.triggers_accepted, 2);
    assert_eq!(stats.edges_suppressed, 1);
    assert_eq!(stats.frames_sent, 2);
}

#[test]
fn event_frames_go_to_broadcast_peer() {
    let mut engine = engine(3.75, 10.0);
    engine.on_button_edge(Instant::from_millis(5));

    let (peer, frame) = engine.transport().sent[0];
    assert!(peer.is_broadcast());
    assert_eq!(frame[0], 1);
    assert_eq!(frame[1], 0);
    assert!(approx(engine.transport().decoded()[0].battery_percent, 50.0));
}

#[test]
fn check_connection_gets_status_reply() {
    let mut engine = engine(3.2, 0.0);
    let sender = PeerAddress([0x5C, 0xCF, 0x7F, 0x00, 0x11, 0x22]);

    let outcome = engine.on_message(&sender, &probe());
    let reply = match outcome {
        MessageOutcome::Replied(reply) => reply,
        other => panic!("expected Replied, got {:?}", other),
    };

    assert!(reply.check_connection);
    assert!(!reply.button_pressed);
    assert!(approx(reply.battery_percent, 0.0));

    let sent = engine.transport().decoded();
    assert_eq!(sent, vec![reply]);
    assert!(engine.transport().sent[0].0.is_broadcast());
    assert_eq!(engine.stats().probes_answered, 1);
}

#[test]
fn reply_samples_fresh_battery_and_reuses_last_light() {
    let mut engine = ProtocolEngine::new(
        MockTransport::default(),
        MockSensors {
            volts: vec![4.2, 4.0, 3.75],
            light: 321.0,
        },
        NodeConfig::default(),
    );

    // 尚未按键，光照为默认值 0
    let before = engine.build_status_reply();
    assert_eq!(before.light_level, 0.0);
    assert!(approx(before.battery_percent, 100.0));

    engine.on_button_edge(Instant::from_millis(0));

    let after = engine.build_status_reply();
    assert_eq!(after.light_level, 321.0);
    assert!(approx(after.battery_percent, 50.0));
    assert!(!after.button_pressed);
}

#[test]
fn status_reply_is_stable_without_events() {
    let mut engine = engine(3.9, 77.0);
    let a = engine.build_status_reply();
    let b = engine.build_status_reply();
    assert_eq!(a, b);
}

#[test]
fn malformed_length_is_discarded_without_send() {
    let mut engine = engine(4.0, 1.0);

    for len in [0usize, 1, 17, 19, 64] {
        let bytes = vec![0x01u8; len];
        assert_eq!(
            engine.on_message(&PeerAddress::BROADCAST, &bytes),
            MessageOutcome::Discarded(DiscardReason::Malformed(NodeError::MalformedReceive { len }))
        );
    }

    assert!(engine.transport().sent.is_empty());
    assert_eq!(engine.stats().malformed, 5);
}

#[test]
fn non_probe_message_is_ignored() {
    let mut engine = engine(4.0, 1.0);
    let event = TelemetryMessage::button_event(50.0, 2.0).to_bytes();

    assert_eq!(engine.on_message(&PeerAddress::BROADCAST, &event), MessageOutcome::Ignored);
    assert!(engine.transport().sent.is_empty());
}

#[test]
fn peer_only_filter_drops_strangers() {
    let peer = PeerAddress([0x24, 0x0A, 0xC4, 0x01, 0x02, 0x03]);
    let stranger = PeerAddress([0x24, 0x0A, 0xC4, 0x0F, 0x0F, 0x0F]);
    let config = NodeConfig {
        peer,
        probe_filter: ProbeFilter::PeerOnly,
        ..NodeConfig::default()
    };
    let mut engine = ProtocolEngine::new(
        MockTransport::default(),
        MockSensors::steady(4.0, 0.0),
        config,
    );

    assert_eq!(
        engine.on_message(&stranger, &probe()),
        MessageOutcome::Discarded(DiscardReason::UnknownSender(stranger))
    );
    assert!(matches!(engine.on_message(&peer, &probe()), MessageOutcome::Replied(_)));
    assert_eq!(engine.transport().sent[0].0, peer);
}

#[test]
fn rejected_send_is_lost_not_retried() {
    let mut engine = engine(4.0, 1.0);
    engine.transport_mut().reject = Some(TransportError::QueueFull);

    assert_eq!(
        engine.on_button_edge(Instant::from_millis(0)),
        TriggerOutcome::SendFailed(NodeError::SendFailed(TransportError::QueueFull))
    );
    assert_eq!(
        engine.on_message(&PeerAddress::BROADCAST, &probe()),
        MessageOutcome::ReplyFailed(NodeError::SendFailed(TransportError::QueueFull))
    );

    // 恢复后不会补发丢失的事件；窗口仍从被接受的那次算起
    engine.transport_mut().reject = None;
    assert_eq!(engine.on_button_edge(Instant::from_millis(2000)), TriggerOutcome::Suppressed);
    assert!(engine.transport().sent.is_empty());
    assert_eq!(engine.stats().send_rejected, 2);
    assert_eq!(engine.stats().frames_sent, 0);
    // 回复没发出去，不算已应答
    assert_eq!(engine.stats().probes_answered, 0);
}

#[test]
fn malformed_frame_from_stranger_counts_as_malformed() {
    let peer = PeerAddress([0x24, 0x0A, 0xC4, 0x01, 0x02, 0x03]);
    let stranger = PeerAddress([0x24, 0x0A, 0xC4, 0x0F, 0x0F, 0x0F]);
    let config = NodeConfig {
        peer,
        probe_filter: ProbeFilter::PeerOnly,
        ..NodeConfig::default()
    };
    let mut engine = ProtocolEngine::new(
        MockTransport::default(),
        MockSensors::steady(4.0, 0.0),
        config,
    );

    assert_eq!(
        engine.on_message(&stranger, &[0x01; 5]),
        MessageOutcome::Discarded(DiscardReason::Malformed(NodeError::MalformedReceive { len: 5 }))
    );
    assert_eq!(engine.stats().malformed, 1);
    assert_eq!(engine.stats().ignored, 0);
    assert!(engine.transport().sent.is_empty());
}

#[test]
fn custom_calibration_is_validated() {
    static LIPO: [CalibrationPoint; 3] = [
        CalibrationPoint::new(4.2, 100.0),
        CalibrationPoint::new(3.7, 40.0),
        CalibrationPoint::new(3.3, 0.0),
    ];
    static RISING: [CalibrationPoint; 2] = [
        CalibrationPoint::new(3.3, 0.0),
        CalibrationPoint::new(4.2, 100.0),
    ];

    let mut engine = ProtocolEngine::with_calibration(
        MockTransport::default(),
        MockSensors::steady(3.7, 0.0),
        NodeConfig::default(),
        &LIPO,
    )
    .unwrap();
    assert!(approx(engine.battery_percent(), 40.0));

    let rejected = ProtocolEngine::with_calibration(
        MockTransport::default(),
        MockSensors::steady(3.7, 0.0),
        NodeConfig::default(),
        &RISING,
    );
    assert!(matches!(
        rejected,
        Err(NodeError::InvalidCurve(CurveError::NotDescending { .. }))
    ));
}

#[test]
fn link_failure_is_reported_as_delivery_fail() {
    let mut engine = engine(4.0, 1.0);

    assert_eq!(route_event(&mut engine, Event::link_failure()), Routed::Delivery);
    assert_eq!(engine.stats().delivery_failed, 1);
    assert_eq!(engine.stats().delivered, 0);
}

#[test]
fn router_dispatches_every_event_kind() {
    let mut engine = engine(4.2, 5.0);

    let routed = route_event(&mut engine, Event::ButtonEdge { at: Instant::from_millis(0) });
    assert!(matches!(routed, Routed::Trigger(TriggerOutcome::Sent(_))));

    let frame = Event::radio_frame(PeerAddress::BROADCAST, &probe()).unwrap();
    assert!(matches!(
        route_event(&mut engine, frame),
        Routed::Message(MessageOutcome::Replied(_))
    ));

    let short = Event::radio_frame(PeerAddress::BROADCAST, &[1, 2, 3]).unwrap();
    assert_eq!(
        route_event(&mut engine, short),
        Routed::Message(MessageOutcome::Discarded(DiscardReason::Malformed(
            NodeError::MalformedReceive { len: 3 }
        )))
    );

    assert_eq!(
        route_event(&mut engine, Event::Delivery(DeliveryStatus::Success)),
        Routed::Delivery
    );
    route_event(&mut engine, Event::Delivery(DeliveryStatus::Failure));

    let stats = engine.stats();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.delivery_failed, 1);
    assert_eq!(engine.transport().sent.len(), 2);
}
