use crate::dlog;
use crate::types::Workout;
use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key under which the workout list lives in the store file.
pub const WORKOUTS_KEY: &str = "workouts";

/// JSON key-value file holding the persisted workout list.
///
/// Other keys in the file are preserved on every write.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file, missing key or a `null` value means no workouts yet.
    pub fn load(&self) -> Result<Vec<Workout>> {
        let mut map = self.read_map()?;
        let raw = match map.remove(WORKOUTS_KEY) {
            None | Some(JsonValue::Null) => {
                dlog!("store_empty path={}", self.path.display());
                return Ok(Vec::new());
            }
            Some(raw) => raw,
        };

        let workouts: Vec<Workout> = serde_json::from_value(raw)
            .with_context(|| format!("decoding workouts from {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), count = workouts.len(), "loaded workouts");
        Ok(workouts)
    }

    pub fn save(&self, workouts: &[Workout]) -> Result<()> {
        let mut map = self.read_map()?;
        let encoded = serde_json::to_value(workouts).context("encoding workouts")?;
        map.insert(WORKOUTS_KEY.to_string(), encoded);
        self.write_map(&map)?;
        tracing::debug!(path = %self.path.display(), count = workouts.len(), "saved workouts");
        Ok(())
    }

    /// Drops the workout list. Returns whether anything was removed.
    ///
    /// A store that is not a JSON object is replaced by an empty one.
    pub fn clear(&self) -> Result<bool> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    err = ?e,
                    "store unreadable; overwriting with an empty store"
                );
                self.write_map(&Map::new())?;
                return Ok(true);
            }
        };
        if map.remove(WORKOUTS_KEY).is_none() {
            return Ok(false);
        }
        self.write_map(&map)?;
        Ok(true)
    }

    fn read_map(&self) -> Result<Map<String, JsonValue>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let display = self.path.display();
        let text =
            fs::read_to_string(&self.path).with_context(|| format!("reading store: {display}"))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&text).with_context(|| format!("parsing store: {display}"))
    }

    /// Writes through a temp file in the same directory, then renames it
    /// over the store so a crash never leaves a half-written file.
    fn write_map(&self, map: &Map<String, JsonValue>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).with_context(|| format!("creating dir: {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, map).context("writing store json")?;
        tmp.write_all(b"\n").context("writing store json")?;
        tmp.as_file().sync_all().context("syncing store file")?;

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing store: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;

    fn sample() -> Vec<Workout> {
        vec![
            Workout::running(Coords::new(32.0, -54.0), 12.0, 35.0, 178.0),
            Workout::cycling(Coords::new(77.0, -100.0), 34.0, 23.0, 43.0),
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("w.json"));
        let workouts = sample();
        store.save(&workouts).unwrap();
        assert_eq!(store.load().unwrap(), workouts);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("a").join("b").join("w.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn clear_removes_only_the_workouts_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = Store::open(&path);
        store.save(&sample()).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(store.load().unwrap().is_empty());

        let raw: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(WORKOUTS_KEY).is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        fs::write(&path, "{not json").unwrap();
        let err = Store::open(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("parsing store"));
    }

    #[test]
    fn clear_recovers_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        fs::write(&path, "{not json").unwrap();

        let store = Store::open(&path);
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_empty());
        let raw: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({}));
    }

    #[test]
    fn clear_replaces_a_non_object_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = Store::open(&path);
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn null_workouts_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        fs::write(&path, r#"{"workouts": null}"#).unwrap();
        assert!(Store::open(&path).load().unwrap().is_empty());
    }
}
