use crate::types::{ActivityInput, Draft};

/// Rejected workout input. Raised before a [`crate::types::Workout`] is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
}

/// Finite-and-positive checks for a draft.
///
/// Cycling elevation may be zero or negative; everything else that is a
/// magnitude must be strictly positive. Coordinates only need to be finite.
pub fn validate_draft(draft: &Draft) -> Result<(), InputError> {
    finite("latitude", draft.coords.lat())?;
    finite("longitude", draft.coords.lng())?;
    positive("distance", draft.distance_km)?;
    positive("duration", draft.duration_min)?;

    match draft.input {
        ActivityInput::Running { cadence_spm } => positive("cadence", cadence_spm),
        ActivityInput::Cycling { elevation_gain_m } => finite("elevation", elevation_gain_m),
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(InputError::NotPositive { field, value })
    }
}
