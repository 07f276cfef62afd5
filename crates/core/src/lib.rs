//! # SlotShare Core
//!
//! Domain logic for shared schedules: the authoring wizard, slot parsing, the
//! appointment conflict checker, share token issuance and the editor for
//! persisted schedules. Storage is reached through the [`store::ScheduleStore`]
//! trait so this crate carries no database or HTTP code.

pub mod conflict;
pub mod editor;
pub mod errors;
pub mod memory;
pub mod models;
pub mod session;
pub mod slot;
pub mod store;
pub mod token;
pub mod wizard;
