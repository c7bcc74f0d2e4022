#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use mapty::cli::{self, Cmd, CommonArgs, LogKind};
use mapty::render::{self, MAP_ZOOM};
use mapty::types::{Coords, Draft};
use mapty::{App, Store, dlog, gpx, utils};
use std::io::Write;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    dlog!("mode={:?} store={}", cli.cmd, cli.store.display());

    // Reset must work even when the store cannot be loaded.
    if matches!(cli.cmd, Cmd::Reset) {
        App::reset_store(&Store::open(&cli.store))?;
        return Ok(());
    }

    let app = App::init(Store::open(&cli.store))?;

    match cli.cmd {
        Cmd::Log { kind } => log_workout(app, &kind),
        Cmd::List { count, details } => {
            if app.workouts().is_empty() {
                tracing::info!("no workouts logged yet");
                return Ok(());
            }
            let limit = count.unwrap_or(usize::MAX);
            for w in app.latest_first().take(limit) {
                if details {
                    let created = w.created_at().to_rfc3339();
                    println!("{}\t{created}\t{}", w.id(), render::list_entry(w));
                } else {
                    println!("{}", render::list_entry(w));
                }
            }
            Ok(())
        }
        Cmd::Show { id } => {
            let Some(w) = app.find(&id) else {
                anyhow::bail!("No workout with id {id}. Run `mapty list --details` to see ids.");
            };
            println!("{}", render::marker_label(w));
            println!("{}", w.coords());
            println!("{}", render::map_link(w.coords(), MAP_ZOOM));
            Ok(())
        }
        Cmd::ExportGpx { out } => {
            let mut sink = utils::open_output(&out)?;
            gpx::write_waypoints(app.workouts(), &mut sink)?;
            sink.flush()
                .with_context(|| format!("flushing {}", out.display()))?;
            tracing::info!(
                out = %out.display(),
                waypoints = app.workouts().len(),
                "gpx written"
            );
            Ok(())
        }
        Cmd::Reset => unreachable!("reset is handled before the store is loaded"),
    }
}

fn log_workout(mut app: App, kind: &LogKind) -> Result<()> {
    let draft = match *kind {
        LogKind::Running {
            common:
                CommonArgs {
                    lat,
                    lng,
                    distance,
                    duration,
                },
            cadence,
        } => Draft::running(Coords::new(lat, lng), distance, duration, cadence),
        LogKind::Cycling {
            common:
                CommonArgs {
                    lat,
                    lng,
                    distance,
                    duration,
                },
            elevation,
        } => Draft::cycling(Coords::new(lat, lng), distance, duration, elevation),
    };

    let w = app.add(draft)?;
    println!("{}", render::marker_label(w));
    println!("{}", render::list_entry(w));
    Ok(())
}
