//! mapty: log runs and bike rides at map coordinates.
//!
//! The model ([`types`]) computes pace or speed once at creation; the
//! [`app::App`] context validates input, appends to the list and persists it
//! through [`store::Store`].

pub mod app;
pub mod cli;
pub mod gpx;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;
pub mod validate;

pub use app::App;
pub use store::Store;
pub use types::{Activity, ActivityInput, Coords, Draft, Workout, WorkoutKind};
pub use validate::{InputError, validate_draft};
