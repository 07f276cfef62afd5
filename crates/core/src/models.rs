pub mod appointment;
pub mod options;
pub mod shared_schedule;

/// Header naming the professional on whose behalf an operator request runs.
pub const PROFESSIONAL_ID_HEADER: &str = "x-professional-id";
