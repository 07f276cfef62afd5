//! # Shared Schedule Wizard
//!
//! The authoring flow for a shared schedule, as a pure reducer. A
//! [`WizardState`] is a plain value; [`WizardState::apply`] consumes it with a
//! [`WizardEvent`] and returns the next state plus an [`Outcome`] telling the
//! caller what happened.
//!
//! The steps are strictly linear:
//!
//! ```text
//! BasicInfo -> Services -> LocationsCompanies -> Slots -> Success
//! ```
//!
//! Moving forward validates the current step and, on failure, leaves the state
//! untouched and reports a [`WizardNotice`]. Moving back never validates.
//! `Next` on `Slots` does not move at all: it hands a [`ScheduleDraft`] to the
//! caller through [`Outcome::Submit`], and only `Submitted` reaches `Success`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::shared_schedule::CreateSharedScheduleRequest,
    slot::{Slot, SlotInputError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    BasicInfo,
    Services,
    LocationsCompanies,
    Slots,
    Success,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::BasicInfo,
        WizardStep::Services,
        WizardStep::LocationsCompanies,
        WizardStep::Slots,
        WizardStep::Success,
    ];

    /// Zero-based position, for progress indicators.
    pub fn index(&self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Services => 1,
            Self::LocationsCompanies => 2,
            Self::Slots => 3,
            Self::Success => 4,
        }
    }

    fn forward(&self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Services),
            Self::Services => Some(Self::LocationsCompanies),
            Self::LocationsCompanies => Some(Self::Slots),
            Self::Slots | Self::Success => None,
        }
    }

    fn backward(&self) -> Option<Self> {
        match self {
            Self::Services => Some(Self::BasicInfo),
            Self::LocationsCompanies => Some(Self::Services),
            Self::Slots => Some(Self::LocationsCompanies),
            Self::BasicInfo | Self::Success => None,
        }
    }
}

/// Reasons the wizard refused an event, shown to the operator as a transient
/// notice. Validation notices never come with a modified state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardNotice {
    #[error("Enter a title for the schedule")]
    MissingTitle,

    #[error("The title must be at most 255 characters")]
    TitleTooLong,

    #[error("Select both a start and an end date")]
    MissingDates,

    #[error("The end date must not be before the start date")]
    EndBeforeStart,

    #[error("Select at least one service")]
    NoServices,

    #[error("Select at least one location")]
    NoLocations,

    #[error("Select at least one billing company")]
    NoCompanies,

    #[error("Add at least one time slot")]
    NoSlots,

    #[error("{0}")]
    InvalidSlot(#[from] SlotInputError),

    #[error("Slot {0} is already in the list")]
    DuplicateSlot(Slot),

    #[error("Slot {0} falls outside the schedule's dates")]
    SlotOutsideRange(Slot),

    #[error("The slot conflicts with an existing appointment: {0}")]
    SlotConflict(String),

    #[error("Wait for the availability check to finish")]
    SlotNotChecked,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Could not create the shared schedule: {0}")]
    SubmissionFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardData {
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub service_ids: BTreeSet<Uuid>,
    pub location_ids: BTreeSet<Uuid>,
    pub company_ids: BTreeSet<Uuid>,
    /// Candidate slots, kept in chronological order without duplicates.
    pub slots: Vec<Slot>,
    pub link: Option<String>,
}

impl WizardData {
    pub fn contains_slot(&self, slot: &Slot) -> bool {
        self.slots.binary_search(slot).is_ok()
    }
}

/// Longest title or patient name the store accepts, in characters.
pub const MAX_TEXT_LENGTH: usize = 255;

pub fn validate_title(title: &str) -> Result<(), WizardNotice> {
    let title = title.trim();
    if title.is_empty() {
        return Err(WizardNotice::MissingTitle);
    }
    if title.chars().count() > MAX_TEXT_LENGTH {
        return Err(WizardNotice::TitleTooLong);
    }
    Ok(())
}

/// Every slot must fall on a day between `start` and `end`, inclusive.
pub fn validate_slot_range(slots: &[Slot], start: NaiveDate, end: NaiveDate) -> Result<(), WizardNotice> {
    match slots.iter().find(|slot| slot.date() < start || slot.date() > end) {
        Some(slot) => Err(WizardNotice::SlotOutsideRange(*slot)),
        None => Ok(()),
    }
}

pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), WizardNotice> {
    let (Some(start), Some(end)) = (start_date, end_date) else {
        return Err(WizardNotice::MissingDates);
    };
    if start > end {
        return Err(WizardNotice::EndBeforeStart);
    }
    Ok((start, end))
}

pub fn validate_basic_info(data: &WizardData) -> Result<(), WizardNotice> {
    validate_title(&data.title)?;
    validate_date_range(data.start_date, data.end_date)?;
    Ok(())
}

pub fn validate_services(data: &WizardData) -> Result<(), WizardNotice> {
    if data.service_ids.is_empty() {
        return Err(WizardNotice::NoServices);
    }
    Ok(())
}

pub fn validate_locations_companies(data: &WizardData) -> Result<(), WizardNotice> {
    if data.location_ids.is_empty() {
        return Err(WizardNotice::NoLocations);
    }
    if data.company_ids.is_empty() {
        return Err(WizardNotice::NoCompanies);
    }
    Ok(())
}

pub fn validate_slots(data: &WizardData) -> Result<(), WizardNotice> {
    if data.slots.is_empty() {
        return Err(WizardNotice::NoSlots);
    }
    if let (Some(start), Some(end)) = (data.start_date, data.end_date) {
        validate_slot_range(&data.slots, start, end)?;
    }
    Ok(())
}

/// Applies the wizard's step rules to a creation request that did not come
/// through a wizard, such as one received over HTTP.
pub fn validate_request(request: &CreateSharedScheduleRequest) -> Result<(), WizardNotice> {
    validate_title(&request.title)?;
    validate_date_range(Some(request.start_date), Some(request.end_date))?;
    if request.service_ids.is_empty() {
        return Err(WizardNotice::NoServices);
    }
    if request.location_ids.is_empty() {
        return Err(WizardNotice::NoLocations);
    }
    if request.company_ids.is_empty() {
        return Err(WizardNotice::NoCompanies);
    }
    if request.slots.is_empty() {
        return Err(WizardNotice::NoSlots);
    }
    validate_slot_range(&request.slots, request.start_date, request.end_date)
}

/// Everything needed to create the schedule except its token, which is only
/// issued once the operator actually submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub service_ids: Vec<Uuid>,
    pub location_ids: Vec<Uuid>,
    pub company_ids: Vec<Uuid>,
    pub slots: Vec<Slot>,
}

impl ScheduleDraft {
    /// Validates every step and assembles the draft. Fails with the first
    /// notice in step order.
    pub fn from_data(data: &WizardData) -> Result<Self, WizardNotice> {
        validate_title(&data.title)?;
        let (start_date, end_date) = validate_date_range(data.start_date, data.end_date)?;
        validate_services(data)?;
        validate_locations_companies(data)?;
        validate_slots(data)?;

        Ok(Self {
            title: data.title.trim().to_string(),
            start_date,
            end_date,
            service_ids: data.service_ids.iter().copied().collect(),
            location_ids: data.location_ids.iter().copied().collect(),
            company_ids: data.company_ids.iter().copied().collect(),
            slots: data.slots.clone(),
        })
    }

    pub fn into_request(self, token: String) -> CreateSharedScheduleRequest {
        CreateSharedScheduleRequest {
            token,
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            service_ids: self.service_ids,
            location_ids: self.location_ids,
            company_ids: self.company_ids,
            slots: self.slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    SetTitle(String),
    SetStartDate(Option<NaiveDate>),
    SetEndDate(Option<NaiveDate>),
    ToggleService(Uuid),
    ToggleLocation(Uuid),
    ToggleCompany(Uuid),
    AddSlot { date: Option<NaiveDate>, time: String },
    RemoveSlot(Slot),
    Next,
    Back,
    Submitted { link: String },
    SubmissionFailed { reason: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event was applied.
    Updated,
    /// The event had nothing to act on (e.g. `Back` on the first step).
    Ignored,
    Rejected(WizardNotice),
    /// Every step validated; the caller should issue a token and persist.
    Submit(ScheduleDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WizardState,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub data: WizardData,
    pub submitting: bool,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Success
    }

    pub fn apply(self, event: WizardEvent) -> Transition {
        if self.step == WizardStep::Success && event != WizardEvent::Reset {
            return self.ignored();
        }

        match event {
            WizardEvent::SetTitle(title) => self.update(|data| data.title = title),
            WizardEvent::SetStartDate(date) => self.update(|data| data.start_date = date),
            WizardEvent::SetEndDate(date) => self.update(|data| data.end_date = date),
            WizardEvent::ToggleService(id) => self.update(|data| toggle(&mut data.service_ids, id)),
            WizardEvent::ToggleLocation(id) => {
                self.update(|data| toggle(&mut data.location_ids, id))
            }
            WizardEvent::ToggleCompany(id) => self.update(|data| toggle(&mut data.company_ids, id)),
            WizardEvent::AddSlot { date, time } => self.add_slot(date, &time),
            WizardEvent::RemoveSlot(slot) => self.remove_slot(slot),
            WizardEvent::Next => self.next(),
            WizardEvent::Back => self.back(),
            WizardEvent::Submitted { link } => self.submitted(link),
            WizardEvent::SubmissionFailed { reason } => self.submission_failed(reason),
            WizardEvent::Reset => Transition {
                state: Self::new(),
                outcome: Outcome::Updated,
            },
        }
    }

    fn update(mut self, edit: impl FnOnce(&mut WizardData)) -> Transition {
        edit(&mut self.data);
        Transition {
            state: self,
            outcome: Outcome::Updated,
        }
    }

    fn ignored(self) -> Transition {
        Transition {
            state: self,
            outcome: Outcome::Ignored,
        }
    }

    fn rejected(self, notice: WizardNotice) -> Transition {
        Transition {
            state: self,
            outcome: Outcome::Rejected(notice),
        }
    }

    fn add_slot(mut self, date: Option<NaiveDate>, time: &str) -> Transition {
        let slot = match Slot::from_input(date, time) {
            Ok(slot) => slot,
            Err(err) => return self.rejected(err.into()),
        };
        if let (Some(start), Some(end)) = (self.data.start_date, self.data.end_date) {
            if let Err(notice) = validate_slot_range(&[slot], start, end) {
                return self.rejected(notice);
            }
        }

        match self.data.slots.binary_search(&slot) {
            Ok(_) => self.rejected(WizardNotice::DuplicateSlot(slot)),
            Err(position) => {
                self.data.slots.insert(position, slot);
                Transition {
                    state: self,
                    outcome: Outcome::Updated,
                }
            }
        }
    }

    fn remove_slot(mut self, slot: Slot) -> Transition {
        match self.data.slots.binary_search(&slot) {
            Ok(position) => {
                self.data.slots.remove(position);
                Transition {
                    state: self,
                    outcome: Outcome::Updated,
                }
            }
            Err(_) => self.ignored(),
        }
    }

    fn next(mut self) -> Transition {
        let check = match self.step {
            WizardStep::BasicInfo => validate_basic_info(&self.data),
            WizardStep::Services => validate_services(&self.data),
            WizardStep::LocationsCompanies => validate_locations_companies(&self.data),
            WizardStep::Slots => return self.submit(),
            WizardStep::Success => return self.ignored(),
        };
        if let Err(notice) = check {
            return self.rejected(notice);
        }

        match self.step.forward() {
            Some(step) => {
                self.step = step;
                Transition {
                    state: self,
                    outcome: Outcome::Updated,
                }
            }
            None => self.ignored(),
        }
    }

    fn submit(mut self) -> Transition {
        if self.submitting {
            return self.rejected(WizardNotice::AlreadySubmitting);
        }
        match ScheduleDraft::from_data(&self.data) {
            Ok(draft) => {
                self.submitting = true;
                Transition {
                    state: self,
                    outcome: Outcome::Submit(draft),
                }
            }
            Err(notice) => self.rejected(notice),
        }
    }

    fn back(mut self) -> Transition {
        if self.submitting {
            return self.rejected(WizardNotice::AlreadySubmitting);
        }
        match self.step.backward() {
            Some(step) => {
                self.step = step;
                Transition {
                    state: self,
                    outcome: Outcome::Updated,
                }
            }
            None => self.ignored(),
        }
    }

    fn submitted(mut self, link: String) -> Transition {
        if !self.submitting {
            return self.ignored();
        }
        self.submitting = false;
        self.step = WizardStep::Success;
        self.data.link = Some(link);
        Transition {
            state: self,
            outcome: Outcome::Updated,
        }
    }

    fn submission_failed(mut self, reason: String) -> Transition {
        if !self.submitting {
            return self.ignored();
        }
        self.submitting = false;
        Transition {
            state: self,
            outcome: Outcome::Rejected(WizardNotice::SubmissionFailed(reason)),
        }
    }
}

fn toggle(set: &mut BTreeSet<Uuid>, id: Uuid) {
    if !set.remove(&id) {
        set.insert(id);
    }
}
