pub mod conflicts;
pub mod options;
pub mod public;
pub mod shared_schedule;
