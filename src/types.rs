use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Ids keep the last 10 decimal digits of the creation millisecond.
const ID_DIGITS: usize = 10;

static LAST_ID_MS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Latitude/longitude pair in degrees. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self(lat, lng)
    }

    pub const fn lat(self) -> f64 {
        self.0
    }

    pub const fn lng(self) -> f64 {
        self.1
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        })
    }
}

/// Kind-specific input, before the derived metric exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityInput {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl ActivityInput {
    pub const fn kind(self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Everything the caller supplies for a new workout.
///
/// Callers are expected to run [`crate::validate::validate_draft`] before
/// turning a draft into a [`Workout`]; construction itself never checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draft {
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub input: ActivityInput,
}

impl Draft {
    pub const fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self {
            coords,
            distance_km,
            duration_min,
            input: ActivityInput::Running { cadence_spm },
        }
    }

    pub const fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self {
            coords,
            distance_km,
            duration_min,
            input: ActivityInput::Cycling { elevation_gain_m },
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.input.kind()
    }
}

/// Variant data of a stored workout, tagged by `kind` in the flat encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Activity {
    Running {
        #[serde(rename = "cadenceSpm")]
        cadence_spm: f64,
        #[serde(rename = "paceMinPerKm")]
        pace_min_per_km: f64,
    },
    Cycling {
        #[serde(rename = "elevationGainM")]
        elevation_gain_m: f64,
        #[serde(rename = "speedKmPerH")]
        speed_km_per_h: f64,
    },
}

impl Activity {
    /// Computes the derived metric for `input`. Degenerate distance/duration
    /// give an infinite or NaN metric.
    fn derive(input: ActivityInput, distance_km: f64, duration_min: f64) -> Self {
        match input {
            ActivityInput::Running { cadence_spm } => Self::Running {
                cadence_spm,
                pace_min_per_km: duration_min / distance_km,
            },
            ActivityInput::Cycling { elevation_gain_m } => Self::Cycling {
                elevation_gain_m,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            },
        }
    }

    pub const fn kind(self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// One logged activity. Immutable once built; every field is computed in
/// the constructor and only exposed through getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(flatten)]
    activity: Activity,
}

impl Workout {
    pub fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::from_draft(Draft::running(coords, distance_km, duration_min, cadence_spm))
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::from_draft(Draft::cycling(
            coords,
            distance_km,
            duration_min,
            elevation_gain_m,
        ))
    }

    /// Stamps the draft with the current time and a fresh id.
    pub fn from_draft(draft: Draft) -> Self {
        let created_at = Utc::now();
        let id = next_id(created_at);
        Self::with_identity(id, created_at, draft)
    }

    pub fn with_identity(id: impl Into<String>, created_at: DateTime<Utc>, draft: Draft) -> Self {
        let Draft {
            coords,
            distance_km,
            duration_min,
            input,
        } = draft;

        Self {
            id: id.into(),
            created_at,
            coords,
            distance_km,
            duration_min,
            description: describe(input.kind(), created_at),
            activity: Activity::derive(input, distance_km, duration_min),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn activity(&self) -> Activity {
        self.activity
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub const fn pace_min_per_km(&self) -> Option<f64> {
        match self.activity {
            Activity::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn speed_km_per_h(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            Activity::Running { .. } => None,
        }
    }

    pub const fn cadence_spm(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence_spm, .. } => Some(cadence_spm),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn elevation_gain_m(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling {
                elevation_gain_m, ..
            } => Some(elevation_gain_m),
            Activity::Running { .. } => None,
        }
    }
}

/// "Running on April 7", month and day in local time.
fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    let local = created_at.with_timezone(&Local);
    format!("{kind} on {}", local.format("%B %-d"))
}

/// Millisecond-derived id, bumped past the last one issued in this process
/// so two workouts created within the same millisecond still differ.
fn next_id(created_at: DateTime<Utc>) -> String {
    let now_ms = created_at.timestamp_millis();
    let (Ok(prev) | Err(prev)) = LAST_ID_MS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now_ms.max(last.saturating_add(1)))
    });
    let ms = now_ms.max(prev.saturating_add(1));

    let digits = ms.to_string();
    let start = digits.len().saturating_sub(ID_DIGITS);
    digits[start..].to_string()
}
