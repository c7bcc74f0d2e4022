use crate::types::{Activity, Coords, Workout, WorkoutKind};

/// Zoom level used when centring the map on a workout.
pub const MAP_ZOOM: u8 = 13;

pub const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

/// Popup text of the map marker, e.g. "🏃‍♂️ Running on April 7".
pub fn marker_label(w: &Workout) -> String {
    format!("{} {}", icon(w.kind()), w.description())
}

/// One line of the workout list.
pub fn list_entry(w: &Workout) -> String {
    let (metric, metric_unit, extra_icon, extra, extra_unit) = match w.activity() {
        Activity::Running {
            cadence_spm,
            pace_min_per_km,
        } => (pace_min_per_km, "min/km", "🦶🏼", cadence_spm, "spm"),
        Activity::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => (speed_km_per_h, "km/h", "⛰", elevation_gain_m, "m"),
    };

    // Halves round up, not to even.
    let metric = (metric + 0.5).floor();

    format!(
        "{desc}  {icon} {dist} km  ⏱ {dur} min  ⚡️ {metric:.0} {metric_unit}  {extra_icon} {extra} {extra_unit}",
        desc = w.description(),
        icon = icon(w.kind()),
        dist = w.distance_km(),
        dur = w.duration_min(),
    )
}

/// OpenStreetMap link centred on `coords`.
pub fn map_link(coords: Coords, zoom: u8) -> String {
    let (lat, lng) = (coords.lat(), coords.lng());
    format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}")
}
