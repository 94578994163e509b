//! The file-backed configuration object.
//!
//! [`YamlConfigManager`] holds an ordered mapping in memory and, when it is
//! tied to a file, coordinates access to that file with other processes
//! through [`crate::lock`] sentinels.
//!
//! # Lifecycle
//!
//! An object is in one of three states:
//!
//! - **Detached**: no backing file. It can be read and mutated, and written
//!   out with [`YamlConfigManager::write_to`], but never becomes writable.
//! - **Read-only**: tied to a file, no lock held. Mutations stay in memory.
//! - **Writable**: tied to a file and holding its lock. Only in this state
//!   does [`YamlConfigManager::write`] persist to the backing file.
//!
//! The usual way to become writable is a writable scope, which guarantees
//! the lock is released again however the scope ends:
//!
//! ```no_run
//! use yacman::YamlConfigManager;
//!
//! let mut cfg = YamlConfigManager::builder()
//!     .filepath("conf.yaml")
//!     .build()?;
//!
//! cfg.with_writable(|cfg| {
//!     cfg.set("y", 10);
//!     cfg.write()
//! })?;
//! # Ok::<(), yacman::Error>(())
//! ```
//!
//! # Merging
//!
//! Becoming writable and [`YamlConfigManager::rebase`] both reload the file
//! and layer the in-memory data over it with [`deep_merge`]: keys only on
//! disk are picked up, and keys held in memory win, being treated as the
//! more recent edit.

use std::fmt;
use std::fs;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::codec;
use crate::error::{Error, Result};
use crate::expand::expand_mapping;
use crate::lock;
use crate::path::absolutize;
use crate::schema::Schema;

/// Default time to wait for a contended lock.
pub const DEFAULT_WAIT_MAX: Duration = Duration::from_secs(60);

/// Name kept for code written against the first generation of the API.
pub type YacAttMap = YamlConfigManager;

/// Recursively layer `overlay` on top of `base`.
///
/// For every key in `overlay`: when both sides hold a mapping and the
/// overlay's is non-empty, the two are merged recursively; otherwise the
/// overlay value replaces whatever `base` had. Keys new to `base` are
/// appended, existing keys keep their position.
///
/// # Examples
///
/// ```
/// use yacman::{codec::load_str, deep_merge};
///
/// let mut disk = load_str("a: 1\nb: 2\nnested: {x: 1}\n").unwrap();
/// let local = load_str("a: 99\nnested: {y: 2}\n").unwrap();
/// deep_merge(&mut disk, local);
/// assert_eq!(disk, load_str("a: 99\nb: 2\nnested: {x: 1, y: 2}\n").unwrap());
/// ```
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) if !incoming.is_empty() => {
                if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                    deep_merge(existing, incoming);
                } else {
                    base.insert(key, Value::Mapping(incoming));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Builder for [`YamlConfigManager`].
///
/// Sources are combined in a fixed order: the backing file is loaded
/// first and `entries` are laid over it key by key. YAML text is only used
/// when no file path is given, and `entries` are laid over it the same
/// way.
///
/// # Examples
///
/// ```
/// use yacman::YamlConfigManager;
///
/// let cfg = YamlConfigManager::builder()
///     .yaml_data("x: 5\n")
///     .entry("y", 6)
///     .build()
///     .unwrap();
///
/// assert_eq!(cfg.len(), 2);
/// assert!(cfg.filepath().is_none());
/// ```
#[derive(Debug)]
pub struct ConfigManagerBuilder {
    entries: Mapping,
    filepath: Option<PathBuf>,
    yaml_data: Option<String>,
    writable: bool,
    wait_max: Duration,
    skip_read_lock: bool,
    schema_source: Option<String>,
    schema: Option<Schema>,
    validate_on_write: bool,
    create_file: bool,
}

impl Default for ConfigManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mapping::new(),
            filepath: None,
            yaml_data: None,
            writable: false,
            wait_max: DEFAULT_WAIT_MAX,
            skip_read_lock: false,
            schema_source: None,
            schema: None,
            validate_on_write: false,
            create_file: false,
        }
    }

    /// Initial entries, laid over whatever the file or text provides.
    #[must_use]
    pub fn entries(mut self, entries: Mapping) -> Self {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
        self
    }

    /// A single initial entry.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(Value::String(key.into()), value.into());
        self
    }

    /// The backing YAML file.
    #[must_use]
    pub fn filepath(mut self, path: impl AsRef<Path>) -> Self {
        self.filepath = Some(path.as_ref().to_path_buf());
        self
    }

    /// YAML text to parse when no file path is set.
    #[must_use]
    pub fn yaml_data(mut self, text: impl Into<String>) -> Self {
        self.yaml_data = Some(text.into());
        self
    }

    /// Take the write lock during construction.
    #[must_use]
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Maximum time to wait for a contended lock.
    #[must_use]
    pub fn wait_max(mut self, wait_max: Duration) -> Self {
        self.wait_max = wait_max;
        self
    }

    /// Read the file without taking the read lock.
    #[must_use]
    pub fn skip_read_lock(mut self, skip: bool) -> Self {
        self.skip_read_lock = skip;
        self
    }

    /// Path or URL of a schema to validate against.
    ///
    /// When a schema is configured the object is validated once at
    /// construction.
    #[must_use]
    pub fn schema_source(mut self, source: impl Into<String>) -> Self {
        self.schema_source = Some(source.into());
        self
    }

    /// An already-loaded schema; takes priority over `schema_source`.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Validate before every [`YamlConfigManager::write`].
    #[must_use]
    pub fn validate_on_write(mut self, validate: bool) -> Self {
        self.validate_on_write = validate;
        self
    }

    /// Create an empty backing file if it does not exist.
    #[must_use]
    pub fn create_file(mut self, create: bool) -> Self {
        self.create_file = create;
        self
    }

    /// Build the configuration object.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if the file is missing and `create_file`
    ///   was not requested, or a local schema source does not exist
    /// - [`Error::LockTimeout`] if the file stays locked beyond `wait_max`
    /// - [`Error::PermissionDenied`] if the lock cannot be created
    /// - parse errors from the file or YAML text
    /// - [`Error::SchemaValidation`] if the loaded data fails the schema
    pub fn build(self) -> Result<YamlConfigManager> {
        let filepath = self.filepath.as_deref().map(absolutize).transpose()?;

        let mut writable = self.writable;
        if writable && filepath.is_none() {
            log::warn!(
                "Argument 'writable' is disregarded when the object is created \
                 without a file path"
            );
            writable = false;
        }

        let schema = match (self.schema, self.schema_source) {
            (Some(schema), _) => Some(schema),
            (None, Some(source)) => Some(Schema::load(&source)?),
            (None, None) => None,
        };

        let mut manager = YamlConfigManager {
            data: Mapping::new(),
            filepath: filepath.clone(),
            writable: false,
            wait_max: self.wait_max,
            skip_read_lock: self.skip_read_lock,
            schema,
            validate_on_write: self.validate_on_write,
        };

        let mut data = match filepath {
            Some(path) => {
                if self.yaml_data.is_some() {
                    log::debug!("Ignoring YAML text: a file path takes priority");
                }
                if writable {
                    lock::acquire(&path, manager.wait_max)?;
                    manager.writable = true;
                }
                manager.read_backing_file(&path, self.create_file)?
            }
            None => match self.yaml_data {
                Some(text) => codec::load_str(&text)?,
                None => Mapping::new(),
            },
        };

        if let Value::Mapping(entries) = codec::normalize_keys(Value::Mapping(self.entries))? {
            for (key, value) in entries {
                data.insert(key, value);
            }
        }
        manager.data = data;

        if manager.schema.is_some() {
            manager.validate(None)?;
        }
        Ok(manager)
    }
}

/// A YAML-backed configuration mapping with advisory file locking.
///
/// Plain lookups return the raw stored values. [`YamlConfigManager::exp`]
/// returns a copy with `~` and environment variables expanded.
///
/// If the object is dropped while writable, its lock is released on a
/// best-effort basis; prefer [`YamlConfigManager::with_writable`] or
/// [`YamlConfigManager::writable_scope`], which release deterministically.
#[derive(Debug)]
pub struct YamlConfigManager {
    data: Mapping,
    filepath: Option<PathBuf>,
    writable: bool,
    wait_max: Duration,
    skip_read_lock: bool,
    schema: Option<Schema>,
    validate_on_write: bool,
}

impl YamlConfigManager {
    /// Start building a configuration object.
    #[must_use]
    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    /// A detached object holding `entries`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_yaml::{Mapping, Value};
    /// use yacman::YamlConfigManager;
    ///
    /// let mut entries = Mapping::new();
    /// entries.insert("x".into(), 5.into());
    /// let cfg = YamlConfigManager::from_entries(entries);
    /// assert_eq!(cfg.get("x").unwrap(), &Value::from(5));
    /// ```
    #[must_use]
    pub fn from_entries(entries: Mapping) -> Self {
        let data = match codec::normalize_keys(Value::Mapping(entries.clone())) {
            Ok(Value::Mapping(normalized)) => normalized,
            _ => entries,
        };
        Self {
            data,
            filepath: None,
            writable: false,
            wait_max: DEFAULT_WAIT_MAX,
            skip_read_lock: false,
            schema: None,
            validate_on_write: false,
        }
    }

    /// A read-only object loaded from `path`, using default settings.
    ///
    /// # Errors
    ///
    /// See [`ConfigManagerBuilder::build`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().filepath(path).build()
    }

    /// A detached object parsed from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not a YAML mapping.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::builder().yaml_data(text).build()
    }

    fn read_backing_file(&self, path: &Path, create_file: bool) -> Result<Mapping> {
        if path.exists() {
            if self.writable || self.skip_read_lock {
                return codec::load_path(path);
            }
            lock::acquire(path, self.wait_max)?;
            let loaded = codec::load_path(path);
            let released = lock::release(path);
            let data = loaded?;
            released?;
            return Ok(data);
        }
        if create_file {
            log::debug!("File does not exist, creating {}", path.display());
            fs::File::create(path).map_err(|e| Error::io(path, e))?;
            return Ok(Mapping::new());
        }
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }

    /// The backing file, if any.
    #[must_use]
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// Attach this object to a (different) backing file.
    ///
    /// If the object currently holds a lock on its old file, that lock is
    /// released first.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be made absolute or the old lock
    /// cannot be released.
    pub fn set_filepath(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = absolutize(path.as_ref())?;
        if self.filepath.as_deref() == Some(path.as_path()) {
            return Ok(());
        }
        if self.writable {
            self.make_readonly()?;
        }
        log::info!("Resetting filepath to: {}", path.display());
        self.filepath = Some(path);
        Ok(())
    }

    /// Whether this object currently holds the write lock.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Maximum time lock acquisition waits.
    #[must_use]
    pub fn wait_max(&self) -> Duration {
        self.wait_max
    }

    /// Change how long lock acquisition waits.
    pub fn set_wait_max(&mut self, wait_max: Duration) {
        self.wait_max = wait_max;
    }

    /// The schema loaded at construction, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Whether writes validate first.
    #[must_use]
    pub fn validate_on_write(&self) -> bool {
        self.validate_on_write
    }

    /// Acquire the write lock and reconcile with the file.
    ///
    /// Calling this on an object that is already writable does nothing.
    /// Otherwise the file is re-read once the lock is held and the
    /// in-memory data is merged over it with [`deep_merge`]. A missing or
    /// unreadable file leaves the in-memory data as it is.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFilepath`] if the object is detached
    /// - [`Error::LockTimeout`] or [`Error::PermissionDenied`] from locking
    pub fn make_writable(&mut self) -> Result<()> {
        if self.writable {
            log::info!("Object is already writable");
            return Ok(());
        }
        let path = self.filepath.clone().ok_or(Error::NoFilepath)?;

        lock::acquire(&path, self.wait_max)?;
        self.writable = true;

        match codec::load_path(&path) {
            Ok(on_disk) => self.layer_over(on_disk),
            Err(e) if e.is_not_found() => {
                log::debug!("File '{}' not found", path.display());
            }
            Err(e) => {
                log::info!("File '{}' was not read: {e}", path.display());
            }
        }
        log::debug!("Made object writable");
        Ok(())
    }

    /// Release the write lock, if this object holds it.
    ///
    /// Returns whether a lock was removed. Safe to call on any object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] or [`Error::Io`] if the sentinel
    /// cannot be removed; the object then stays writable.
    pub fn make_readonly(&mut self) -> Result<bool> {
        if !self.writable {
            return Ok(false);
        }
        let Some(path) = self.filepath.as_deref() else {
            self.writable = false;
            return Ok(false);
        };
        let removed = lock::release(path)?;
        self.writable = false;
        if removed {
            log::debug!("Made object read-only");
        }
        Ok(removed)
    }

    /// Enter a writable scope, returning whether the object already was
    /// writable (in which case leaving the scope must keep the lock).
    pub(crate) fn enter_writable(&mut self) -> Result<bool> {
        if self.writable {
            log::debug!("Already writable upon entering writable scope");
            return Ok(true);
        }
        self.make_writable()?;
        Ok(false)
    }

    pub(crate) fn exit_writable(&mut self, already_writable: bool) -> Result<()> {
        if already_writable {
            return Ok(());
        }
        self.make_readonly().map(|_| ())
    }

    /// Run `body` inside a writable scope.
    ///
    /// The lock is acquired on entry unless the object already holds it,
    /// and in that case it is kept on exit. Otherwise it is released on exit
    /// whether `body` succeeded or not. An error from `body` is returned in
    /// preference to an error from releasing.
    ///
    /// # Errors
    ///
    /// Errors from [`YamlConfigManager::make_writable`], from `body`, or
    /// from releasing the lock.
    pub fn with_writable<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let already_writable = self.enter_writable()?;
        let outcome = body(self);
        let exited = self.exit_writable(already_writable);
        let value = outcome?;
        exited?;
        Ok(value)
    }

    /// Enter a writable scope held by a guard.
    ///
    /// The guard dereferences to the object. Dropping it leaves the scope;
    /// a failure to release the lock at that point is logged. Use
    /// [`WritableScope::close`] to observe that failure instead.
    ///
    /// # Errors
    ///
    /// Errors from [`YamlConfigManager::make_writable`].
    pub fn writable_scope(&mut self) -> Result<WritableScope<'_>> {
        let already_writable = self.enter_writable()?;
        Ok(WritableScope {
            manager: self,
            already_writable,
            closed: false,
        })
    }

    /// Persist the data to the backing file.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFilepath`] if the object is detached
    /// - [`Error::WriteDenied`] if the object does not hold the lock
    /// - [`Error::SchemaValidation`] if `validate_on_write` is set and the
    ///   data is invalid (the lock is released in that case)
    pub fn write(&mut self) -> Result<PathBuf> {
        self.write_with_schema(None)
    }

    /// Like [`YamlConfigManager::write`], validating against `schema`
    /// (or the object's own schema when `None` and `validate_on_write` is
    /// set).
    ///
    /// # Errors
    ///
    /// See [`YamlConfigManager::write`].
    pub fn write_with_schema(&mut self, schema: Option<&Schema>) -> Result<PathBuf> {
        let path = self.filepath.clone().ok_or(Error::NoFilepath)?;
        if !self.writable {
            return Err(Error::WriteDenied {
                path,
                reason: "the object is not writable; write from within a writable scope"
                    .to_string(),
            });
        }
        if schema.is_some() || self.validate_on_write {
            self.validate(schema)?;
        }
        self.persist(&path)?;
        log::debug!("Wrote to a file: {}", path.display());
        Ok(path)
    }

    /// Write the data to `path` outside the object's own lock.
    ///
    /// The target is locked for the duration of the write. Writing to the
    /// object's own file while it is writable goes through
    /// [`YamlConfigManager::write`] instead.
    ///
    /// # Errors
    ///
    /// - [`Error::WriteDenied`] if another holder has `path` locked
    /// - locking and I/O errors
    pub fn write_to(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let target = absolutize(path.as_ref())?;
        if self.writable && self.filepath.as_deref() == Some(target.as_path()) {
            return self.write();
        }
        if lock::is_locked(&target) {
            return Err(Error::WriteDenied {
                path: target,
                reason: "the file is locked by a different process".to_string(),
            });
        }
        if target.exists() {
            log::warn!("Writing to an unlocked, existing file. Beware of collisions.");
        }

        lock::acquire(&target, self.wait_max)?;
        let written = self.persist(&target);
        let released = lock::release(&target);
        written?;
        released?;
        log::debug!("Wrote to a file: {}", target.display());
        Ok(target)
    }

    /// Write the rendered YAML to `path` through a temporary file renamed
    /// into place, keeping the permissions of a file being replaced.
    fn persist(&self, path: &Path) -> Result<()> {
        let text = self.to_yaml()?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| Error::io(tmp.path(), e))?;
        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(tmp.path(), meta.permissions())
                .map_err(|e| Error::io(tmp.path(), e))?;
        }
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
        Ok(())
    }

    /// Reload the file and merge the in-memory data over it.
    ///
    /// Keys only on disk are picked up and in-memory values win wherever
    /// both sides have a key. Lock state is not touched.
    ///
    /// # Errors
    ///
    /// [`Error::NoFilepath`] for detached objects, [`Error::FileNotFound`]
    /// if the file is gone, or a parse error.
    pub fn rebase(&mut self) -> Result<()> {
        let path = self.filepath.clone().ok_or(Error::NoFilepath)?;
        let on_disk = codec::load_path(&path)?;
        self.layer_over(on_disk);
        Ok(())
    }

    /// Discard in-memory changes: reload from the file, or clear the data
    /// of a detached object.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] if the backing file is gone, or a parse
    /// error.
    pub fn reset(&mut self) -> Result<()> {
        self.data = match &self.filepath {
            Some(path) => codec::load_path(path)?,
            None => Mapping::new(),
        };
        Ok(())
    }

    fn layer_over(&mut self, on_disk: Mapping) {
        let local = std::mem::replace(&mut self.data, on_disk);
        deep_merge(&mut self.data, local);
    }

    /// Validate the expanded data against `schema`, or the object's own.
    ///
    /// On failure, a file-backed object releases any lock it holds before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// [`Error::NoSchema`] if no schema is available, or
    /// [`Error::SchemaValidation`].
    pub fn validate(&mut self, schema: Option<&Schema>) -> Result<()> {
        let outcome = match schema.or(self.schema.as_ref()) {
            Some(schema) => schema.validate(&self.exp()),
            None => return Err(Error::NoSchema),
        };
        if let Err(e) = outcome {
            log::error!("Configuration object did not pass schema validation");
            if self.filepath.is_some() {
                if let Err(release_err) = self.make_readonly() {
                    log::warn!("Could not release lock after failed validation: {release_err}");
                }
            }
            return Err(e);
        }
        log::debug!("Validated successfully");
        Ok(())
    }

    /// Look up a top-level key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.data.get(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Mutable access to a top-level value, for nested edits.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        self.data.get_mut(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Insert or replace a top-level value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(Value::String(key.into()), value.into())
    }

    /// Remove a top-level key, returning its value.
    ///
    /// Only `key` is removed. An entry whose name equals the removed value
    /// stays in place, and alias tables built over this object keep their
    /// definitions for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn delete(&mut self, key: &str) -> Result<Value> {
        self.data.shift_remove(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Whether a top-level key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().filter_map(Value::as_str)
    }

    /// Top-level entries in order.
    pub fn iter(&self) -> serde_yaml::mapping::Iter<'_> {
        self.data.iter()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw stored data.
    #[must_use]
    pub fn data(&self) -> &Mapping {
        &self.data
    }

    /// Mutable access to the raw stored data.
    pub fn data_mut(&mut self) -> &mut Mapping {
        &mut self.data
    }

    /// A copy of the data with `~` and environment variables expanded in
    /// string values. The stored data is not changed.
    #[must_use]
    pub fn exp(&self) -> Mapping {
        expand_mapping(&self.data)
    }

    /// Deserialize the expanded data into a typed value.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] if the data does not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(Value::Mapping(self.exp()))?)
    }

    /// YAML rendering of the raw data.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] if a value cannot be serialized.
    pub fn to_yaml(&self) -> Result<String> {
        codec::dump(&self.data)
    }
}

impl<'a> IntoIterator for &'a YamlConfigManager {
    type Item = (&'a Value, &'a Value);
    type IntoIter = serde_yaml::mapping::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl fmt::Display for YamlConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_yaml() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{:?}", self.data),
        }
    }
}

impl Drop for YamlConfigManager {
    fn drop(&mut self) {
        if self.writable && self.filepath.is_some() {
            if let Err(e) = self.make_readonly() {
                log::warn!("Failed to release lock while dropping configuration object: {e}");
            }
        }
    }
}

/// Guard for a writable scope, created by
/// [`YamlConfigManager::writable_scope`].
///
/// Leaving the scope releases the lock unless the object was already
/// writable when the scope was entered.
pub struct WritableScope<'a> {
    manager: &'a mut YamlConfigManager,
    already_writable: bool,
    closed: bool,
}

impl WritableScope<'_> {
    /// Whether the object was already writable when the scope began.
    #[must_use]
    pub fn was_already_writable(&self) -> bool {
        self.already_writable
    }

    /// Leave the scope now, reporting a failure to release the lock.
    ///
    /// # Errors
    ///
    /// Errors from [`YamlConfigManager::make_readonly`].
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.manager.exit_writable(self.already_writable)
    }
}

impl Deref for WritableScope<'_> {
    type Target = YamlConfigManager;

    fn deref(&self) -> &Self::Target {
        self.manager
    }
}

impl DerefMut for WritableScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.manager
    }
}

impl Drop for WritableScope<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.manager.exit_writable(self.already_writable) {
            log::warn!("Failed to release lock when leaving writable scope: {e}");
        }
    }
}
