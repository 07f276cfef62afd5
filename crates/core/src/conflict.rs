//! # Slot Conflict Checker
//!
//! Warns the operator when a candidate slot collides with an appointment the
//! professional already has. Each change to the date or time input restarts a
//! 300 ms debounce; once it elapses and the input is a complete, valid, new
//! slot, the store is queried.
//!
//! Every input change takes a new sequence number. A debounced task or a
//! response carrying an older number is dropped, so a slow answer for an old
//! input can never overwrite the answer for the current one.
//!
//! The check is advisory: a failed query is logged and does not block the
//! operator.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    models::appointment::ConflictRecord,
    slot::{Slot, SlotInputError},
    store::ScheduleStore,
    wizard::WizardNotice,
};

pub const CONFLICT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictStatus {
    /// Date or time not filled in yet.
    Idle,
    Invalid(SlotInputError),
    /// The slot is already a candidate; adding it again would be rejected.
    AlreadyAdded(Slot),
    /// Waiting out the debounce window.
    Pending(Slot),
    Checking(Slot),
    Clear(Slot),
    Conflict(ConflictRecord),
    Failed { slot: Slot, reason: String },
}

impl ConflictStatus {
    /// Whether the "add slot" action is enabled for this status.
    pub fn allows_add(&self) -> bool {
        matches!(self, Self::Clear(_) | Self::Failed { .. })
    }

    pub fn is_checking(&self) -> bool {
        matches!(self, Self::Pending(_) | Self::Checking(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SlotInput {
    date: Option<NaiveDate>,
    time: String,
}

#[derive(Debug)]
struct CheckerState {
    seq: u64,
    input: SlotInput,
    status: ConflictStatus,
    task: Option<JoinHandle<()>>,
}

impl CheckerState {
    fn new() -> Self {
        Self {
            seq: 0,
            input: SlotInput::default(),
            status: ConflictStatus::Idle,
            task: None,
        }
    }

    /// Records a new input and returns the sequence number and slot to query,
    /// or `None` when no query is needed.
    fn begin(&mut self, input: SlotInput, existing: &[Slot]) -> Option<(u64, Slot)> {
        self.seq += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }

        let status = match Slot::from_input(input.date, &input.time) {
            Err(SlotInputError::MissingDate | SlotInputError::MissingTime) => ConflictStatus::Idle,
            Err(err) => ConflictStatus::Invalid(err),
            Ok(slot) if existing.contains(&slot) => ConflictStatus::AlreadyAdded(slot),
            Ok(slot) => ConflictStatus::Pending(slot),
        };
        self.input = input;

        let query = match &status {
            ConflictStatus::Pending(slot) => Some((self.seq, *slot)),
            _ => None,
        };
        self.status = status;
        query
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq == seq
    }

    /// Applies a finished check. Returns `false` when the result is stale.
    fn resolve(&mut self, seq: u64, status: ConflictStatus) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.status = status;
        self.task = None;
        true
    }
}

pub struct ConflictChecker {
    store: Arc<dyn ScheduleStore>,
    professional_id: Uuid,
    debounce: Duration,
    state: Arc<Mutex<CheckerState>>,
}

impl ConflictChecker {
    pub fn new(store: Arc<dyn ScheduleStore>, professional_id: Uuid) -> Self {
        Self::with_debounce(store, professional_id, CONFLICT_DEBOUNCE)
    }

    pub fn with_debounce(store: Arc<dyn ScheduleStore>, professional_id: Uuid, debounce: Duration) -> Self {
        Self {
            store,
            professional_id,
            debounce,
            state: Arc::new(Mutex::new(CheckerState::new())),
        }
    }

    /// Feeds the current date and time input. `existing` is the wizard's
    /// candidate list, used to skip queries for slots already added.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn input_changed(&self, date: Option<NaiveDate>, time: &str, existing: &[Slot]) {
        let input = SlotInput {
            date,
            time: time.to_string(),
        };

        let mut state = lock(&self.state);
        let Some((seq, slot)) = state.begin(input, existing) else {
            return;
        };

        let shared = Arc::clone(&self.state);
        let store = Arc::clone(&self.store);
        let professional_id = self.professional_id;
        let debounce = self.debounce;

        state.task = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            {
                let mut state = lock(&shared);
                if !state.is_current(seq) {
                    return;
                }
                state.status = ConflictStatus::Checking(slot);
            }

            let status = match store.find_conflict(professional_id, slot).await {
                Ok(Some(record)) => ConflictStatus::Conflict(record),
                Ok(None) => ConflictStatus::Clear(slot),
                Err(err) => {
                    tracing::warn!("Conflict check for {} failed: {:#}", slot, err);
                    ConflictStatus::Failed {
                        slot,
                        reason: err.to_string(),
                    }
                }
            };

            if !lock(&shared).resolve(seq, status) {
                tracing::debug!("Discarded stale conflict check for {}", slot);
            }
        }));
    }

    pub fn status(&self) -> ConflictStatus {
        lock(&self.state).status.clone()
    }

    /// Whether the operator may add the slot described by this exact input.
    /// Any input other than the last one fed in is refused, since its check
    /// has not run.
    pub fn can_add(&self, date: Option<NaiveDate>, time: &str) -> bool {
        let state = lock(&self.state);
        state.input.date == date && state.input.time == time && state.status.allows_add()
    }

    /// Gate for an add attempt with this input. Only conflicts and unfinished
    /// checks refuse here; malformed or duplicate input is left to the wizard
    /// reducer, which reports it precisely. An `AlreadyAdded` status for a
    /// slot no longer in `existing` is stale and counts as unchecked.
    pub fn check_add(&self, date: Option<NaiveDate>, time: &str, existing: &[Slot]) -> Result<(), WizardNotice> {
        let state = lock(&self.state);
        if state.input.date != date || state.input.time != time {
            return Err(WizardNotice::SlotNotChecked);
        }
        match &state.status {
            ConflictStatus::Pending(_) | ConflictStatus::Checking(_) => Err(WizardNotice::SlotNotChecked),
            ConflictStatus::AlreadyAdded(slot) if !existing.contains(slot) => Err(WizardNotice::SlotNotChecked),
            ConflictStatus::Conflict(record) => Err(WizardNotice::SlotConflict(record.describe())),
            _ => Ok(()),
        }
    }

    /// Re-runs the last input against a changed candidate list.
    pub fn recheck(&self, existing: &[Slot]) {
        let input = lock(&self.state).input.clone();
        self.input_changed(input.date, &input.time, existing);
    }

    /// Forgets the current input and drops any check in flight.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.begin(SlotInput::default(), &[]);
    }
}

impl Drop for ConflictChecker {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.state).task.take() {
            task.abort();
        }
    }
}

fn lock(state: &Mutex<CheckerState>) -> MutexGuard<'_, CheckerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
