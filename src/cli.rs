use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE: &str = "mapty-workouts.json";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log runs and bike rides at map coordinates and keep them in a local store"
)]
pub struct Cli {
    /// Path to the JSON store holding the workout list.
    #[arg(long, env = "MAPTY_STORE", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a new workout at a coordinate.
    Log {
        #[command(subcommand)]
        kind: LogKind,
    },

    /// Print the workout list, newest first.
    List {
        /// Show at most this many workouts.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Prefix each line with the id and creation time.
        #[arg(long)]
        details: bool,
    },

    /// Print the location of one workout and a map link centred on it.
    Show {
        /// Workout id as printed by `list --details`.
        id: String,
    },

    /// Write all workouts as GPX waypoints.
    ExportGpx {
        /// Output file (`-` for stdout).
        out: PathBuf,
    },

    /// Delete every stored workout.
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum LogKind {
    Running {
        #[command(flatten)]
        common: CommonArgs,

        /// Steps per minute.
        #[arg(long)]
        cadence: f64,
    },
    Cycling {
        #[command(flatten)]
        common: CommonArgs,

        /// Elevation gain in meters (may be negative).
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Latitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Distance in km.
    #[arg(long)]
    pub distance: f64,

    /// Duration in minutes.
    #[arg(long)]
    pub duration: f64,
}
