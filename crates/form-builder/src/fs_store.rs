use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use form_spec::{
    Field, Overwrite, SnapshotEntry, SnapshotIndex, SnapshotStore, StoreError, validate_name,
};
use time::OffsetDateTime;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.json";

/// Snapshot store backed by a directory: `index.json` plus one
/// `form_<name>.json` per snapshot.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("form_{name}.json"))
    }

    fn read_index(&self) -> Result<SnapshotIndex, StoreError> {
        match fs::read_to_string(self.index_path()) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(SnapshotIndex::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_index(&self, index: &SnapshotIndex) -> Result<(), StoreError> {
        fs::write(self.index_path(), serde_json::to_string_pretty(index)?)?;
        Ok(())
    }
}

impl SnapshotStore for FsStore {
    fn save(
        &mut self,
        name: &str,
        fields: &[Field],
        overwrite: Overwrite,
    ) -> Result<SnapshotEntry, StoreError> {
        let name = validate_name(name)?;
        let mut index = self.read_index()?;
        if overwrite == Overwrite::Deny && index.contains(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        let path = self.snapshot_path(name);
        fs::write(&path, serde_json::to_string_pretty(fields)?)?;
        let entry = index.record(name, OffsetDateTime::now_utc());
        self.write_index(&index)?;
        info!(name, path = %path.display(), fields = fields.len(), "snapshot saved");
        Ok(entry)
    }

    fn load(&self, name: &str) -> Result<Option<Vec<Field>>, StoreError> {
        let name = validate_name(name)?;
        if !self.read_index()?.contains(name) {
            debug!(name, "snapshot not in index");
            return Ok(None);
        }
        match fs::read_to_string(self.snapshot_path(name)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> Result<Vec<SnapshotEntry>, StoreError> {
        Ok(self.read_index()?.entries().to_vec())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = validate_name(name)?;
        let mut index = self.read_index()?;
        let removed = index.remove(name);
        if removed {
            self.write_index(&index)?;
        }
        match fs::remove_file(self.snapshot_path(name)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_spec::FieldKind;

    fn sample() -> Vec<Field> {
        vec![Field::new("q1", "Notes", FieldKind::Comment)]
    }

    #[test]
    fn persists_across_instances() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let mut store = FsStore::open(temp.path().join("snapshots")).expect("open");
        store
            .save("weekly check-in", &sample(), Overwrite::Deny)
            .expect("save");
        assert!(
            temp.path()
                .join("snapshots")
                .join("form_weekly check-in.json")
                .is_file()
        );

        let reopened = FsStore::open(store.dir().to_path_buf()).expect("reopen");
        assert_eq!(
            reopened.load("weekly check-in").expect("load"),
            Some(sample())
        );
        assert_eq!(reopened.list().expect("list").len(), 1);
    }

    #[test]
    fn overwrite_is_refused_by_default() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let mut store = FsStore::open(temp.path()).expect("open");
        store.save("a", &sample(), Overwrite::Deny).expect("save");
        assert!(matches!(
            store.save("a", &[], Overwrite::Deny),
            Err(StoreError::AlreadyExists(_))
        ));
        store.save("a", &[], Overwrite::Allow).expect("overwrite");
        assert_eq!(store.load("a").expect("load"), Some(Vec::new()));
    }

    #[test]
    fn delete_removes_file_and_entry() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let mut store = FsStore::open(temp.path()).expect("open");
        store.save("a", &sample(), Overwrite::Deny).expect("save");
        assert!(store.delete("a").expect("delete"));
        assert!(!temp.path().join("form_a.json").exists());
        assert!(store.list().expect("list").is_empty());
        assert!(!store.delete("a").expect("delete again"));
    }

    #[test]
    fn missing_index_is_empty() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let store = FsStore::open(temp.path()).expect("open");
        assert!(store.list().expect("list").is_empty());
        assert_eq!(store.load("nothing").expect("load"), None);
    }
}
