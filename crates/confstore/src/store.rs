//! The configuration store
//!
//! One `ConfigStore` per backing file. Construction performs no I/O; the
//! file is created (if missing), checked, and parsed on the first `get`
//! or `set`, and the parsed mapping is kept for the store's lifetime.
//! `save` rewrites the whole document. There is no invalidation: to pick
//! up external edits, construct a fresh store.

use indexmap::IndexMap;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::value::Value;

/// Filename of the fixed-path variant, under the user's home directory.
const DEFAULT_FILE_NAME: &str = ".confstore.yml";

/// A key-value configuration store backed by one YAML file
#[derive(Debug)]
pub struct ConfigStore {
    /// Path to the backing file; immutable after construction
    path: PathBuf,
    /// When set, all settings live under this single top-level key
    root_key: Option<String>,
    /// In-memory mapping; None until the first accessor triggers a load
    data: Option<IndexMap<String, Value>>,
}

impl ConfigStore {
    /// Open a store over the given backing file.
    ///
    /// No I/O happens here: the file is read (and created if absent) on
    /// the first `get` or `set`. Fails if the path is empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::path_not_set());
        }
        Ok(Self {
            path,
            root_key: None,
            data: None,
        })
    }

    /// Open a store whose settings are nested under a single top-level key.
    ///
    /// With a root key of `"vim"`, a lookup of `"submodules"` reads
    /// `vim.submodules` in the file, and `save` writes the whole mapping
    /// back under `vim:`. Loading a non-empty document that lacks the
    /// root key is an invalid-format error.
    pub fn open_with_root_key(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let mut store = Self::open(path)?;
        store.root_key = Some(key.into());
        Ok(store)
    }

    /// Open a store over the default per-user location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// The default backing file location: `.confstore.yml` in the user's
    /// home directory.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::path_not_set()
                .with_help("Set the HOME environment variable, or open the store with an explicit path")
        })?;
        Ok(home.join(DEFAULT_FILE_NAME))
    }

    /// Path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The root key, if this store is namespaced
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    /// Whether the backing file has been parsed yet
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Get the value stored under `key`.
    ///
    /// Triggers the load on first use. Missing keys are `Ok(None)`; the
    /// value comes back exactly as stored, with no type coercion.
    pub fn get(&mut self, key: impl AsRef<str>) -> Result<Option<Value>> {
        let data = self.load_if_needed()?;
        Ok(data.get(key.as_ref()).cloned())
    }

    /// Assign `value` to `key` in the in-memory mapping.
    ///
    /// Triggers the load on first use. Nothing is written to disk until
    /// `save` is called.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let data = self.load_if_needed()?;
        data.insert(key.into(), value.into());
        Ok(())
    }

    /// Serialize the in-memory mapping and overwrite the backing file.
    ///
    /// Fails with an empty-config error if neither `get` nor `set` has
    /// run yet. The write truncates and rewrites the file in place; a
    /// crash mid-write can leave a partial document.
    pub fn save(&self) -> Result<()> {
        self.check_accessible(true)?;

        let Some(data) = &self.data else {
            return Err(Error::empty_config(&self.path));
        };

        let document = match &self.root_key {
            Some(key) => {
                let mut outer = IndexMap::new();
                outer.insert(key.clone(), Value::Mapping(data.clone()));
                Value::Mapping(outer)
            }
            None => Value::Mapping(data.clone()),
        };

        let text = serde_yaml::to_string(&document)
            .map_err(|e| Error::invalid_format(&self.path, e.to_string()))?;

        fs::write(&self.path, text).map_err(|e| match e.kind() {
            IoErrorKind::PermissionDenied => Error::not_writable(&self.path),
            _ => Error::io(&self.path, &e),
        })?;

        log::debug!("wrote {} keys to {}", data.len(), self.path.display());
        Ok(())
    }

    fn load_if_needed(&mut self) -> Result<&mut IndexMap<String, Value>> {
        if self.data.is_none() {
            self.data = Some(self.load()?);
        }
        Ok(self.data.get_or_insert_with(IndexMap::new))
    }

    /// Read and parse the backing file. Runs at most once per store.
    fn load(&self) -> Result<IndexMap<String, Value>> {
        self.check_accessible(false)?;

        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            IoErrorKind::PermissionDenied => Error::not_readable(&self.path),
            IoErrorKind::InvalidData => {
                Error::invalid_format(&self.path, "file contents are not valid UTF-8")
            }
            _ => Error::io(&self.path, &e),
        })?;

        let data = self.parse(&text)?;
        log::debug!("loaded {} keys from {}", data.len(), self.path.display());
        Ok(data)
    }

    fn parse(&self, text: &str) -> Result<IndexMap<String, Value>> {
        let doc: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(text)
                .map_err(|e| Error::invalid_format(&self.path, e.to_string()))?
        };

        // An empty or null document counts as an empty mapping, so a
        // freshly created file is usable without errors.
        let mut root = match doc {
            Value::Null => IndexMap::new(),
            Value::Mapping(map) => map,
            other => {
                return Err(Error::invalid_format(
                    &self.path,
                    format!("document root is a {}, expected a mapping", other.type_name()),
                ))
            }
        };

        let Some(key) = &self.root_key else {
            return Ok(root);
        };

        if root.is_empty() {
            return Ok(IndexMap::new());
        }

        match root.shift_remove(key) {
            Some(Value::Mapping(section)) => Ok(section),
            // A bare `key:` line parses as null; treat it as an empty section.
            Some(Value::Null) => Ok(IndexMap::new()),
            Some(other) => Err(Error::invalid_format(
                &self.path,
                format!("'{}' is a {}, expected a mapping", key, other.type_name()),
            )),
            None => Err(Error::invalid_format(
                &self.path,
                format!("missing top-level '{}' key", key),
            )
            .with_help(format!("Add a '{}:' mapping at the top of the file", key))),
        }
    }

    /// Verify the backing file can be used, creating it if absent.
    fn check_accessible(&self, require_writable: bool) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::path_not_set());
        }

        self.ensure_file()?;

        if let Err(e) = fs::File::open(&self.path) {
            return Err(match e.kind() {
                IoErrorKind::PermissionDenied => Error::not_readable(&self.path),
                _ => Error::io(&self.path, &e),
            });
        }

        if require_writable {
            // Probe for write access without truncating anything.
            if let Err(e) = OpenOptions::new().write(true).open(&self.path) {
                return Err(match e.kind() {
                    IoErrorKind::PermissionDenied => Error::not_writable(&self.path),
                    _ => Error::io(&self.path, &e),
                });
            }
        }

        Ok(())
    }

    fn ensure_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        log::debug!("creating empty config file at {}", self.path.display());
        fs::write(&self.path, "").map_err(|e| Error::io(&self.path, &e))
    }
}
