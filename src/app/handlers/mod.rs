pub mod button;
pub mod delivery;
pub mod probe;
