pub mod radio;
pub mod sensors;

pub use radio::{OutboundFrame, RadioLink};
pub use sensors::AdcSensors;
