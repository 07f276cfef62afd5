pub mod conflicts;
pub mod health;
pub mod options;
pub mod public;
pub mod shared_schedule;
