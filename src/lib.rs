// 远程按键节点
//
// 按键上升沿 → 去抖 → 推送事件帧；收到连接检查 → 回复电量/光照状态。
// 无线模块通过 `net::Transport` 接入，本库不依赖具体硬件。
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod net;
pub mod sensor;
pub mod telemetry;

pub use app::{ProtocolEngine, Routed, route_event};
pub use config::NodeConfig;
pub use error::{NodeError, Result};
pub use event::Event;
pub use net::{DeliveryStatus, PeerAddress, Transport, TransportError};
pub use sensor::Sensors;
pub use telemetry::{BatteryCurve, TelemetryMessage, WIRE_LEN};
