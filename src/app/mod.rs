pub mod engine;
pub mod gate;
pub mod handlers;
pub mod router;

pub use engine::{DiscardReason, MessageOutcome, NodeStats, ProtocolEngine, TriggerOutcome};
pub use gate::{GateDecision, TriggerGate};
pub use router::{Routed, route_event};
