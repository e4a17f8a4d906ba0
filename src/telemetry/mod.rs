pub mod battery;
pub mod message;

pub use battery::{BatteryCurve, CalibrationPoint, CurveError, OutOfRange};
pub use message::{TelemetryMessage, WireError, WIRE_LEN};
