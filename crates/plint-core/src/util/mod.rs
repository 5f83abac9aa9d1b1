pub mod deterministic;
pub mod version;
