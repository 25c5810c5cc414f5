//! Artifact store keyed by program name.

use std::fs;
use std::path::{Path, PathBuf};

use radio_models::ProgramRegistration;
use tracing::{debug, info, warn};

use crate::atomic::{atomic_write, atomic_write_json, read_json, remove_if_exists};
use crate::error::{Result, StoreError};

const EXECUTABLE_EXT: &str = "py";
const FLOWGRAPH_EXT: &str = "grc";
const REGISTRATION_EXT: &str = "json";

/// Kind of artifact stored for a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The runnable program text.
    Executable,
    /// The flowgraph definition a compiled program was generated from.
    Flowgraph,
}

impl ArtifactKind {
    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Executable => EXECUTABLE_EXT,
            ArtifactKind::Flowgraph => FLOWGRAPH_EXT,
        }
    }
}

/// Persists program artifacts, one file per program and kind, under a root
/// directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path an artifact of the given kind lives at.
    pub fn artifact_path(&self, name: &str, kind: ArtifactKind) -> PathBuf {
        self.root.join(format!("{}.{}", name, kind.extension()))
    }

    fn registration_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, REGISTRATION_EXT))
    }

    fn check_name(name: &str) -> Result<()> {
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains('\0');
        if bad {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            debug!(root = %self.root.display(), "creating artifact root");
            fs::create_dir_all(&self.root).map_err(|source| StoreError::DirectoryError {
                path: self.root.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Stores an artifact and returns its path.
    pub fn put(&self, name: &str, kind: ArtifactKind, content: &str) -> Result<PathBuf> {
        Self::check_name(name)?;
        self.ensure_root()?;

        let path = self.artifact_path(name, kind);
        info!(program = %name, path = %path.display(), "adding artifact to repository");
        atomic_write(&path, content.as_bytes())?;
        Ok(path)
    }

    /// Returns true if a runnable artifact exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        Self::check_name(name).is_ok() && self.artifact_path(name, ArtifactKind::Executable).is_file()
    }

    /// Removes every artifact stored for `name`.
    ///
    /// Removing a name that was never stored, or was already removed, logs
    /// and returns `Ok(())`.
    pub fn remove(&self, name: &str) -> Result<()> {
        Self::check_name(name)?;

        let mut removed = 0;
        for path in [
            self.artifact_path(name, ArtifactKind::Executable),
            self.artifact_path(name, ArtifactKind::Flowgraph),
            self.registration_path(name),
        ] {
            if remove_if_exists(&path)? {
                debug!(path = %path.display(), "removed artifact");
                removed += 1;
            }
        }

        if removed == 0 {
            info!(program = %name, "nothing to remove: program not registered");
        } else {
            info!(program = %name, files = removed, "removed program from repository");
        }
        Ok(())
    }

    /// Persists a registration next to its artifact.
    pub fn save_registration(&self, registration: &ProgramRegistration) -> Result<()> {
        Self::check_name(&registration.name)?;
        self.ensure_root()?;
        atomic_write_json(&self.registration_path(&registration.name), registration)
    }

    /// Loads every registration whose runnable artifact is still present.
    ///
    /// Unreadable registration files are skipped with a warning.
    pub fn load_registrations(&self) -> Result<Vec<ProgramRegistration>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::ReadError {
            path: self.root.clone(),
            source,
        })?;

        let mut registrations = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::ReadError {
                    path: self.root.clone(),
                    source,
                })?
                .path();

            if !path.extension().is_some_and(|ext| ext == REGISTRATION_EXT) {
                continue;
            }

            match read_json::<ProgramRegistration>(&path) {
                Ok(reg) if reg.artifact_path.is_file() => registrations.push(reg),
                Ok(reg) => {
                    warn!(program = %reg.name, "registration without artifact; skipping");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load registration");
                }
            }
        }

        registrations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(registrations)
    }

    /// Lists the names of all programs with a runnable artifact.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::ReadError {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == EXECUTABLE_EXT))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radio_models::SourceFormat;
    use tempfile::tempdir;

    #[test]
    fn test_put_creates_root_on_first_use() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("radio"));
        assert!(!store.root().exists());

        let path = store.put("fm_receiver", ArtifactKind::Executable, "print(1)").unwrap();

        assert!(store.root().is_dir());
        assert_eq!(path, dir.path().join("radio/fm_receiver.py"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "print(1)");
        assert!(store.contains("fm_receiver"));
    }

    #[test]
    fn test_put_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        for name in ["", "..", "../escape", "a/b", "a\\b"] {
            let result = store.put(name, ArtifactKind::Executable, "x");
            assert!(matches!(result, Err(StoreError::InvalidName(_))), "{name}");
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.put("fm", ArtifactKind::Executable, "x").unwrap();

        store.remove("fm").unwrap();
        assert!(!store.contains("fm"));

        store.remove("fm").unwrap();
        store.remove("never_registered").unwrap();
    }

    #[test]
    fn test_remove_deletes_flowgraph_companion() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let py = store.put("fm", ArtifactKind::Executable, "x").unwrap();
        let grc = store.put("fm", ArtifactKind::Flowgraph, "<flow_graph/>").unwrap();
        assert!(grc.exists());

        store.remove("fm").unwrap();

        assert!(!py.exists());
        assert!(!grc.exists());
    }

    #[test]
    fn test_registrations_reload() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let path = store.put("fm", ArtifactKind::Executable, "x").unwrap();
        let reg = ProgramRegistration::new(
            "fm",
            vec!["--freq".to_string()],
            1240,
            SourceFormat::NativeExecutable,
            path,
        );
        store.save_registration(&reg).unwrap();

        let loaded = store.load_registrations().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "fm");
        assert_eq!(loaded[0].control_port, 1240);
        assert_eq!(loaded[0].launch_args, vec!["--freq".to_string()]);
    }

    #[test]
    fn test_registrations_skip_missing_artifacts_and_garbage() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let orphan = ProgramRegistration::new(
            "orphan",
            vec![],
            1235,
            SourceFormat::NativeExecutable,
            dir.path().join("orphan.py"),
        );
        store.save_registration(&orphan).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        assert!(store.load_registrations().unwrap().is_empty());
    }

    #[test]
    fn test_remove_deletes_registration() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let path = store.put("fm", ArtifactKind::Executable, "x").unwrap();
        let reg = ProgramRegistration::new("fm", vec![], 1235, SourceFormat::NativeExecutable, path);
        store.save_registration(&reg).unwrap();

        store.remove("fm").unwrap();

        assert!(store.load_registrations().unwrap().is_empty());
        assert!(!dir.path().join("fm.json").exists());
    }

    #[test]
    fn test_list() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(ArtifactStore::new(dir.path().join("missing")).list().unwrap().is_empty());

        store.put("zeta", ArtifactKind::Executable, "x").unwrap();
        store.put("alpha", ArtifactKind::Executable, "x").unwrap();
        store.put("alpha", ArtifactKind::Flowgraph, "x").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
