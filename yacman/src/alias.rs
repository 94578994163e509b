//! Alias resolution layered over [`YamlConfigManager`].
//!
//! An alias table maps canonical keys to alternative names:
//!
//! ```yaml
//! hg38: [human, GRCh38]
//! mm10: [mouse]
//! ```
//!
//! Lookups first try the literal key and fall back to the alias table, so
//! `cfg.get("human")` returns the value stored under `hg38`. Aliases are
//! kept in memory only and are never written to the backing file.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use serde_yaml::Value;

use crate::codec::kind_of;
use crate::error::{Error, Result};
use crate::expand::expand;
use crate::manager::YamlConfigManager;

/// Callback producing an alias table from the loaded configuration.
pub type AliasGenerator = Box<dyn FnOnce(&YamlConfigManager) -> Result<Value>>;

/// Where the alias table comes from.
pub enum AliasSource {
    /// A literal table.
    Table(Value),
    /// A callback run once against the loaded configuration.
    Generator(AliasGenerator),
}

impl AliasSource {
    /// Wrap a closure as a generator source.
    pub fn generator<F>(f: F) -> Self
    where
        F: FnOnce(&YamlConfigManager) -> Result<Value> + 'static,
    {
        Self::Generator(Box::new(f))
    }
}

impl From<Value> for AliasSource {
    fn from(table: Value) -> Self {
        Self::Table(table)
    }
}

impl fmt::Debug for AliasSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// How to react to a malformed alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasStrictness {
    /// Fail construction with [`Error::Alias`].
    Raise,
    /// Log a warning and continue with no aliases.
    #[default]
    Warn,
    /// Continue silently with no aliases.
    Ignore,
}

impl AliasStrictness {
    fn report(self, message: String) -> Result<()> {
        match self {
            Self::Raise => Err(Error::Alias(message)),
            Self::Warn => {
                log::warn!("{message}");
                Ok(())
            }
            Self::Ignore => {
                log::debug!("{message}");
                Ok(())
            }
        }
    }
}

/// Read a `{key: [alias, ...]}` table into `(key, aliases)` pairs.
fn parse_table(table: &Value) -> std::result::Result<Vec<(String, Vec<String>)>, String> {
    let mapping = table
        .as_mapping()
        .ok_or_else(|| format!("Alias table must be a mapping, got {}", kind_of(table)))?;

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, aliases) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| format!("Alias table keys must be strings, got {}", kind_of(key)))?;
        let list = aliases
            .as_sequence()
            .ok_or_else(|| format!("Aliases for '{key}' must be a list, got {}", kind_of(aliases)))?;
        let names = list
            .iter()
            .map(|alias| {
                alias.as_str().map(str::to_string).ok_or_else(|| {
                    format!("Aliases for '{key}' must be strings, got {}", kind_of(alias))
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        entries.push((key.to_string(), names));
    }
    Ok(entries)
}

/// A configuration object whose keys can also be reached by alias.
///
/// Dereferences to the wrapped [`YamlConfigManager`]; the methods defined
/// here shadow the core lookups with alias-aware versions.
///
/// # Examples
///
/// ```
/// use yacman::{AliasSource, AliasStrictness, AliasedConfigManager, YamlConfigManager};
///
/// let core = YamlConfigManager::from_yaml_str("hg38: /data/hg38\n").unwrap();
/// let table = serde_yaml::from_str("hg38: [human]").unwrap();
/// let cfg = AliasedConfigManager::new(
///     core,
///     Some(AliasSource::Table(table)),
///     AliasStrictness::Raise,
/// )
/// .unwrap();
///
/// assert_eq!(cfg.get("human").unwrap(), cfg.get("hg38").unwrap());
/// assert_eq!(cfg.get_key("human").unwrap(), "hg38");
/// ```
#[derive(Debug)]
pub struct AliasedConfigManager {
    inner: YamlConfigManager,
    aliases: BTreeMap<String, String>,
    exact: bool,
}

impl AliasedConfigManager {
    /// Wrap `inner`, loading aliases from `source`.
    ///
    /// A malformed table, or a generator that fails, is handled according
    /// to `strictness`. Without a source the object starts with no aliases.
    ///
    /// # Errors
    ///
    /// [`Error::Alias`] when `strictness` is [`AliasStrictness::Raise`] and
    /// the table is malformed or the generator fails.
    pub fn new(
        inner: YamlConfigManager,
        source: Option<AliasSource>,
        strictness: AliasStrictness,
    ) -> Result<Self> {
        let mut manager = Self {
            inner,
            aliases: BTreeMap::new(),
            exact: false,
        };

        let table = match source {
            None => return Ok(manager),
            Some(AliasSource::Table(table)) => table,
            Some(AliasSource::Generator(generate)) => match generate(&manager.inner) {
                Ok(table) => table,
                Err(e) => {
                    strictness.report(format!("Aliases could not be generated: {e}"))?;
                    return Ok(manager);
                }
            },
        };

        match parse_table(&table) {
            Ok(entries) => {
                for (key, names) in entries {
                    for alias in names {
                        manager.aliases.insert(alias, key.clone());
                    }
                }
            }
            Err(message) => strictness.report(message)?,
        }
        Ok(manager)
    }

    /// Wrap `inner` with alias resolution disabled.
    ///
    /// Every lookup behaves exactly like the core's.
    #[must_use]
    pub fn exact(inner: YamlConfigManager) -> Self {
        Self {
            inner,
            aliases: BTreeMap::new(),
            exact: true,
        }
    }

    /// Whether alias resolution is disabled.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Current alias to key table.
    #[must_use]
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// The wrapped core object.
    #[must_use]
    pub fn into_inner(self) -> YamlConfigManager {
        self.inner
    }

    /// The key stored under, for a literal key or an alias of a present key.
    fn resolve<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.inner.contains_key(key) {
            return Some(key);
        }
        if self.exact {
            return None;
        }
        self.aliases
            .get(key)
            .map(String::as_str)
            .filter(|target| self.inner.contains_key(target))
    }

    /// Look up `key`, falling back to its alias target.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] naming `key` when neither resolves.
    pub fn get(&self, key: &str) -> Result<&Value> {
        match self.resolve(key) {
            Some(target) => self.inner.get(target),
            None => Err(Error::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Mutable lookup through aliases.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] naming `key` when neither resolves.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        let target = match self.resolve(key) {
            Some(target) => target.to_string(),
            None => {
                return Err(Error::KeyNotFound {
                    key: key.to_string(),
                })
            }
        };
        self.inner.get_mut(&target)
    }

    /// Look up `key` through aliases and expand the result.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] naming `key` when neither resolves.
    pub fn get_expanded(&self, key: &str) -> Result<Value> {
        self.get(key).map(expand)
    }

    /// Whether `key` is present literally or as an alias of a present key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// Remove the entry `key` resolves to.
    ///
    /// Unlike [`get`](Self::get), the alias table is consulted first: a
    /// name defined as an alias deletes its target even when the same name
    /// is also stored literally. Only a name with no alias deletes the
    /// literal key.
    ///
    /// Alias definitions pointing at the removed key are left in the table
    /// and become live again if the key is set later.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] naming `key` when the resolved entry is absent.
    pub fn delete(&mut self, key: &str) -> Result<Value> {
        let target = match self.aliases.get(key) {
            Some(target) if !self.exact => target.clone(),
            _ => key.to_string(),
        };
        self.inner.delete(&target).map_err(|err| match err {
            Error::KeyNotFound { .. } => Error::KeyNotFound {
                key: key.to_string(),
            },
            other => other,
        })
    }

    /// Every alias pointing at `key`, in sorted order.
    ///
    /// # Errors
    ///
    /// [`Error::UndefinedAlias`] when `key` has no aliases.
    pub fn get_aliases(&self, key: &str) -> Result<Vec<String>> {
        let found: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == key)
            .map(|(alias, _)| alias.clone())
            .collect();
        if found.is_empty() {
            return Err(Error::UndefinedAlias {
                name: key.to_string(),
            });
        }
        Ok(found)
    }

    /// The key an alias points at.
    ///
    /// # Errors
    ///
    /// [`Error::UndefinedAlias`] when `alias` is not defined.
    pub fn get_key(&self, alias: &str) -> Result<&str> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| Error::UndefinedAlias {
                name: alias.to_string(),
            })
    }

    /// Point `aliases` at `key`.
    ///
    /// With `reset_key`, every alias currently pointing at `key` is
    /// dropped first. An alias already bound to a different key is only
    /// rebound when `overwrite` is set.
    ///
    /// Returns the aliases that were added and the ones that were removed.
    pub fn set_aliases<I, S>(
        &mut self,
        key: &str,
        aliases: I,
        overwrite: bool,
        reset_key: bool,
    ) -> (Vec<String>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let removed = if reset_key {
            self.remove_all_aliases(key)
        } else {
            Vec::new()
        };

        let mut added = Vec::new();
        for alias in aliases {
            let alias = alias.into();
            match self.aliases.get(&alias).cloned() {
                Some(current) if current == key => {}
                Some(current) if !overwrite => {
                    log::debug!("Alias '{alias}' already points at '{current}', not overwriting");
                }
                _ => {
                    self.aliases.insert(alias.clone(), key.to_string());
                    added.push(alias);
                }
            }
        }
        log::debug!("Added aliases ({key}: {added:?})");
        (added, removed)
    }

    /// Remove the listed aliases of `key`, returning the ones removed.
    ///
    /// Aliases pointing at a different key are left alone.
    pub fn remove_aliases<I, S>(&mut self, key: &str, aliases: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = Vec::new();
        for alias in aliases {
            let alias = alias.as_ref();
            if self.aliases.get(alias).is_some_and(|target| target == key) {
                self.aliases.remove(alias);
                removed.push(alias.to_string());
            }
        }
        removed
    }

    /// Remove every alias of `key`, returning the ones removed.
    pub fn remove_all_aliases(&mut self, key: &str) -> Vec<String> {
        let mut removed = Vec::new();
        self.aliases.retain(|alias, target| {
            if target.as_str() == key {
                removed.push(alias.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            log::debug!("Removed aliases ({key}: {removed:?})");
        }
        removed
    }

    /// Run `body` inside a writable scope of the wrapped object.
    ///
    /// # Errors
    ///
    /// See [`YamlConfigManager::with_writable`].
    pub fn with_writable<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let already_writable = self.inner.enter_writable()?;
        let outcome = body(self);
        let exited = self.inner.exit_writable(already_writable);
        let value = outcome?;
        exited?;
        Ok(value)
    }
}

impl Deref for AliasedConfigManager {
    type Target = YamlConfigManager;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AliasedConfigManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
