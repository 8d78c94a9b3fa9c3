pub mod index;
pub mod intake;
pub mod schedule;
