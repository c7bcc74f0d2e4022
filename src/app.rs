use crate::store::Store;
use crate::types::{Draft, Workout};
use crate::validate::validate_draft;
use anyhow::{Context, Result};

/// Application context: the persisted workout list and the store behind it.
///
/// Lifecycle is `init` -> commands -> optional `reset`.
#[derive(Debug)]
pub struct App {
    store: Store,
    workouts: Vec<Workout>,
}

impl App {
    pub fn init(store: Store) -> Result<Self> {
        let workouts = store
            .load()
            .with_context(|| format!("loading workouts from {}", store.path().display()))?;
        tracing::info!(
            store = %store.path().display(),
            workouts = workouts.len(),
            "store ready"
        );
        Ok(Self { store, workouts })
    }

    /// Validates, builds, appends and persists a new workout.
    ///
    /// A rejected draft leaves both the list and the store untouched.
    pub fn add(&mut self, draft: Draft) -> Result<&Workout> {
        validate_draft(&draft)?;

        let workout = Workout::from_draft(draft);
        self.workouts.push(workout);

        if let Err(e) = self.store.save(&self.workouts) {
            self.workouts.pop();
            return Err(e);
        }

        let added = &self.workouts[self.workouts.len() - 1];
        tracing::info!(id = added.id(), kind = added.kind().as_str(), "workout logged");
        Ok(added)
    }

    /// Oldest first, in insertion order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Newest first, the order the list is shown in.
    pub fn latest_first(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter().rev()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Clears the persisted list and hands back an empty context.
    pub fn reset(self) -> Result<Self> {
        Self::reset_store(&self.store)?;
        Ok(Self {
            store: self.store,
            workouts: Vec::new(),
        })
    }

    /// Clears the store without loading it first, so a store that no longer
    /// parses can still be reset.
    pub fn reset_store(store: &Store) -> Result<()> {
        let removed = store
            .clear()
            .with_context(|| format!("resetting {}", store.path().display()))?;
        tracing::info!(store = %store.path().display(), had_key = removed, "store reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coords, WorkoutKind};
    use crate::validate::InputError;

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::init(Store::open(dir.path().join("w.json"))).unwrap()
    }

    #[test]
    fn add_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let id = app
            .add(Draft::running(Coords::new(32.0, -54.0), 12.0, 35.0, 178.0))
            .unwrap()
            .id()
            .to_string();
        app.add(Draft::cycling(Coords::new(77.0, -100.0), 34.0, 23.0, 43.0))
            .unwrap();

        let reopened = app_in(&dir);
        assert_eq!(reopened.workouts(), app.workouts());
        assert_eq!(reopened.find(&id).unwrap().kind(), WorkoutKind::Running);
        assert!(reopened.find("missing").is_none());
    }

    #[test]
    fn latest_first_reverses_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(Draft::running(Coords::new(1.0, 1.0), 1.0, 5.0, 160.0))
            .unwrap();
        app.add(Draft::cycling(Coords::new(2.0, 2.0), 10.0, 30.0, 5.0))
            .unwrap();
        let kinds: Vec<_> = app.latest_first().map(Workout::kind).collect();
        assert_eq!(kinds, [WorkoutKind::Cycling, WorkoutKind::Running]);
    }

    #[test]
    fn invalid_draft_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(Draft::running(Coords::new(1.0, 1.0), 1.0, 5.0, 160.0))
            .unwrap();
        let before = std::fs::read_to_string(dir.path().join("w.json")).unwrap();

        let err = app
            .add(Draft::running(Coords::new(1.0, 1.0), -1.0, 5.0, 160.0))
            .unwrap_err();
        assert!(err.downcast_ref::<InputError>().is_some());
        assert_eq!(app.workouts().len(), 1);

        let after = std::fs::read_to_string(dir.path().join("w.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn reset_empties_store_and_context() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(Draft::cycling(Coords::new(2.0, 2.0), 10.0, 30.0, 5.0))
            .unwrap();

        let app = app.reset().unwrap();
        assert!(app.workouts().is_empty());
        assert!(app_in(&dir).workouts().is_empty());
    }

    #[test]
    fn reset_store_recovers_an_unloadable_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(App::init(Store::open(&path)).is_err());

        App::reset_store(&Store::open(&path)).unwrap();
        assert!(app_in(&dir).workouts().is_empty());
    }
}
