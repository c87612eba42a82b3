//! Station form view model.
//!
//! Holds a draft of one station's writable fields and knows whether it is
//! creating a new station or editing an existing one. Field input arrives as
//! text, the way a browser form posts it.

use std::str::FromStr;

use crate::domain::{Station, StationFields, StationId, StationStatus};
use crate::notify::Notifier;
use crate::repository::StationRepository;
use crate::store::{MutationError, StationStore};

/// Where the draft came from; decides between insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOrigin {
    New,
    Editing(StationId),
}

/// Submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Settled,
}

/// A single editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Location,
    Latitude,
    Longitude,
    Status,
    PowerOutput,
    ConnectorType,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::Name,
        DraftField::Location,
        DraftField::Latitude,
        DraftField::Longitude,
        DraftField::Status,
        DraftField::PowerOutput,
        DraftField::ConnectorType,
    ];

    /// Form input name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Location => "location",
            DraftField::Latitude => "latitude",
            DraftField::Longitude => "longitude",
            DraftField::Status => "status",
            DraftField::PowerOutput => "power_output",
            DraftField::ConnectorType => "connector_type",
        }
    }
}

impl FromStr for DraftField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Errors from editing or submitting a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error(transparent)]
    InvalidStatus(#[from] crate::domain::InvalidStatus),

    #[error("a submission is already in flight")]
    Busy,

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Draft of one station plus its submission state.
#[derive(Debug, Clone)]
pub struct StationForm {
    origin: DraftOrigin,
    draft: StationFields,
    phase: SubmitPhase,
}

impl StationForm {
    /// Seed a draft from an existing station, or from the defaults.
    pub fn initialize(existing: Option<&Station>) -> Self {
        let (origin, draft) = match existing {
            Some(station) => (
                DraftOrigin::Editing(station.id.clone()),
                StationFields::from(station),
            ),
            None => (DraftOrigin::New, StationFields::default()),
        };

        Self {
            origin,
            draft,
            phase: SubmitPhase::Idle,
        }
    }

    /// Edit the station with `id` starting from default fields, for when
    /// the stored row is not at hand. The posted fields fill the draft.
    pub fn editing(id: StationId) -> Self {
        Self {
            origin: DraftOrigin::Editing(id),
            draft: StationFields::default(),
            phase: SubmitPhase::Idle,
        }
    }

    pub fn origin(&self) -> &DraftOrigin {
        &self.origin
    }

    pub fn draft(&self) -> &StationFields {
        &self.draft
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.origin, DraftOrigin::Editing(_))
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Set one field from text input. Other fields are untouched.
    ///
    /// Numeric fields never reject input: anything without a leading number
    /// becomes 0.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), FormError> {
        match field {
            DraftField::Name => self.draft.name = value.to_string(),
            DraftField::Location => self.draft.location = value.to_string(),
            DraftField::Latitude => self.draft.latitude = coerce_float(value),
            DraftField::Longitude => self.draft.longitude = coerce_float(value),
            DraftField::Status => self.draft.status = value.parse::<StationStatus>()?,
            DraftField::PowerOutput => self.draft.power_output = coerce_int(value),
            DraftField::ConnectorType => self.draft.connector_type = value.to_string(),
        }
        Ok(())
    }

    /// Set a field by its form input name.
    pub fn set_named(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let field = name.parse::<DraftField>()?;
        self.set_field(field, value)
    }

    /// Submit the draft: update when editing, insert otherwise.
    ///
    /// On success the caller should close the form; the store has already
    /// invalidated the collection. On failure the draft is unchanged and the
    /// form can be submitted again.
    ///
    /// A form already submitting returns [`FormError::Busy`]. This only
    /// guards callers sharing one form in process; each HTTP request builds
    /// its own form.
    pub async fn submit<R, N>(&mut self, store: &StationStore<R, N>) -> Result<Station, FormError>
    where
        R: StationRepository,
        N: Notifier,
    {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }

        self.phase = SubmitPhase::Submitting;
        let result = match &self.origin {
            DraftOrigin::New => store.create(&self.draft).await,
            DraftOrigin::Editing(id) => store.update(id, &self.draft.clone().into()).await,
        };
        self.phase = SubmitPhase::Settled;

        Ok(result?)
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            "Edit Station"
        } else {
            "Add New Station"
        }
    }

    pub fn description(&self) -> &'static str {
        if self.is_editing() {
            "Update the station information below."
        } else {
            "Fill in the details to add a new charging station."
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.is_editing(), self.is_submitting()) {
            (true, false) => "Update Station",
            (false, false) => "Create Station",
            (true, true) => "Updating...",
            (false, true) => "Creating...",
        }
    }
}

/// Parse the longest leading decimal number, or 0.
fn coerce_float(value: &str) -> f64 {
    let prefix = numeric_prefix(value.trim(), true);
    prefix
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the leading integer part, or 0. Out-of-range values saturate.
fn coerce_int(value: &str) -> i32 {
    let prefix = numeric_prefix(value.trim(), false);
    match prefix.parse::<i64>() {
        Ok(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        Err(_) if prefix.len() > 1 => {
            if prefix.starts_with('-') {
                i32::MIN
            } else {
                i32::MAX
            }
        }
        Err(_) => 0,
    }
}

/// Sign, digits and (for floats) one decimal point and exponent.
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if allow_fraction {
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac_end = end + 1;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            if has_digits || frac_end > end + 1 {
                has_digits = true;
                end = frac_end;
            }
        }

        if has_digits && end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_digits = exp_end;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            if exp_end > exp_digits {
                end = exp_end;
            }
        }
    }

    if has_digits { &s[..end] } else { "" }
}
