pub mod exchange;
pub mod pulse;
pub mod types;
