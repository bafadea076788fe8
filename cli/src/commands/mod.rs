pub mod analyze;
pub mod trace;
