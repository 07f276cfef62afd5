//! # Wizard Session
//!
//! Runs the wizard reducer against a [`ScheduleStore`]: loads the picker
//! options, feeds slot input to the conflict checker, gates slot additions on
//! its result, and on submission issues a share token and persists the
//! schedule.

use std::{mem, sync::Arc};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    conflict::{ConflictChecker, ConflictStatus},
    errors::ScheduleResult,
    models::{
        options::ScheduleOptions,
        shared_schedule::{SharedSchedule, share_link},
    },
    store::{ScheduleStore, load_options},
    slot::Slot,
    token::issue_token,
    wizard::{Outcome, ScheduleDraft, WizardData, WizardEvent, WizardNotice, WizardState, WizardStep},
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The professional authoring the schedule; conflicts are checked
    /// against their appointments.
    pub professional_id: Uuid,
    /// Base of the public share link, e.g. `https://clinic.example.com`.
    pub public_base_url: String,
}

pub struct WizardSession {
    store: Arc<dyn ScheduleStore>,
    config: SessionConfig,
    options: ScheduleOptions,
    state: WizardState,
    checker: ConflictChecker,
    notice: Option<WizardNotice>,
    created: Option<SharedSchedule>,
}

impl WizardSession {
    /// Opens a fresh wizard, loading the active services, locations and
    /// billing companies up front.
    pub async fn open(store: Arc<dyn ScheduleStore>, config: SessionConfig) -> ScheduleResult<Self> {
        let options = load_options(store.as_ref()).await?;
        let checker = ConflictChecker::new(Arc::clone(&store), config.professional_id);
        Ok(Self::with_parts(store, config, options, checker))
    }

    /// Builds a session from preloaded options and a custom checker.
    pub fn with_parts(
        store: Arc<dyn ScheduleStore>,
        config: SessionConfig,
        options: ScheduleOptions,
        checker: ConflictChecker,
    ) -> Self {
        Self {
            store,
            config,
            options,
            state: WizardState::new(),
            checker,
            notice: None,
            created: None,
        }
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn data(&self) -> &WizardData {
        &self.state.data
    }

    /// The notice from the last rejected event, until the next event.
    pub fn notice(&self) -> Option<&WizardNotice> {
        self.notice.as_ref()
    }

    pub fn link(&self) -> Option<&str> {
        self.state.data.link.as_deref()
    }

    pub fn created(&self) -> Option<&SharedSchedule> {
        self.created.as_ref()
    }

    /// Applies one event to the wizard. `Next` on the slots step only
    /// produces [`Outcome::Submit`]; use [`WizardSession::next`] to also
    /// perform the submission.
    pub fn dispatch(&mut self, event: WizardEvent) -> Outcome {
        let removes_slot = matches!(event, WizardEvent::RemoveSlot(_));
        let transition = mem::take(&mut self.state).apply(event);
        self.state = transition.state;
        self.notice = match &transition.outcome {
            Outcome::Rejected(notice) => Some(notice.clone()),
            _ => None,
        };
        if removes_slot && transition.outcome == Outcome::Updated {
            // The current input may name the removed slot, which now needs a query.
            self.checker.recheck(&self.state.data.slots);
        }
        transition.outcome
    }

    /// Advances one step, submitting the schedule when on the slots step.
    pub async fn next(&mut self) -> Outcome {
        match self.dispatch(WizardEvent::Next) {
            Outcome::Submit(draft) => self.submit(draft).await,
            outcome => outcome,
        }
    }

    pub fn back(&mut self) -> Outcome {
        self.dispatch(WizardEvent::Back)
    }

    /// Reports a change of the slot date or time field to the conflict checker.
    pub fn time_input_changed(&self, date: Option<NaiveDate>, time: &str) {
        self.checker.input_changed(date, time, &self.state.data.slots);
    }

    pub fn conflict_status(&self) -> ConflictStatus {
        self.checker.status()
    }

    /// Whether the "add slot" action should be enabled for this input.
    pub fn can_add_slot(&self, date: Option<NaiveDate>, time: &str) -> bool {
        self.checker.can_add(date, time)
    }

    pub fn add_slot(&mut self, date: Option<NaiveDate>, time: &str) -> Outcome {
        if let Err(notice) = self.checker.check_add(date, time, &self.state.data.slots) {
            self.notice = Some(notice.clone());
            return Outcome::Rejected(notice);
        }

        let outcome = self.dispatch(WizardEvent::AddSlot {
            date,
            time: time.to_string(),
        });
        if outcome == Outcome::Updated {
            // Same input is now a duplicate; refresh so the UI reflects it.
            self.time_input_changed(date, time);
        }
        outcome
    }

    pub fn remove_slot(&mut self, slot: Slot) -> Outcome {
        self.dispatch(WizardEvent::RemoveSlot(slot))
    }

    /// Issues a token, persists the draft and moves the wizard to `Success`.
    /// Any failure is reported as a rejection and leaves the wizard on the
    /// slots step so the operator can retry.
    pub async fn submit(&mut self, draft: ScheduleDraft) -> Outcome {
        match self.persist(draft).await {
            Ok(schedule) => {
                let link = share_link(&self.config.public_base_url, &schedule.token);
                tracing::info!("Created shared schedule {} ({})", schedule.id, link);
                self.created = Some(schedule);
                self.checker.clear();
                self.dispatch(WizardEvent::Submitted { link })
            }
            Err(err) => {
                tracing::error!("Failed to create shared schedule: {}", err);
                self.dispatch(WizardEvent::SubmissionFailed {
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn persist(&self, draft: ScheduleDraft) -> ScheduleResult<SharedSchedule> {
        let token = issue_token(self.store.as_ref()).await?;
        let request = draft.into_request(token);
        let schedule = self
            .store
            .create_shared_schedule(self.config.professional_id, &request)
            .await?;
        Ok(schedule)
    }

    /// Discards everything entered and starts over on the first step.
    pub fn reset(&mut self) {
        self.checker.clear();
        self.created = None;
        self.dispatch(WizardEvent::Reset);
    }
}
