//! YAML loading and rendering.
//!
//! Documents are parsed into [`serde_yaml::Mapping`], which keeps keys in
//! insertion order. After parsing, every mapping key is normalized to a
//! string: a bare `2:` in a file is looked up as `"2"`, never as the
//! integer `2`.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Parse YAML text into a mapping with string keys.
///
/// An empty document yields an empty mapping.
///
/// # Errors
///
/// Returns [`Error::Yaml`] for malformed text and [`Error::NotAMapping`]
/// when the document's top level is a scalar or a sequence.
///
/// # Examples
///
/// ```
/// use serde_yaml::Value;
/// use yacman::codec::load_str;
///
/// let data = load_str("one: 1\n2: two\n").unwrap();
/// assert_eq!(data.get("2"), Some(&Value::from("two")));
/// assert!(data.get(Value::from(2)).is_none());
/// ```
pub fn load_str(text: &str) -> Result<Mapping> {
    parse(text, "YAML text")
}

/// Read and parse a YAML file.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the file is missing, plus any error
/// [`load_str`] can return.
pub fn load_path(path: &Path) -> Result<Mapping> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&contents, &path.display().to_string())
}

/// Fetch and parse a YAML document over HTTP(S).
///
/// # Errors
///
/// Returns [`Error::Network`] if the request fails or returns an error
/// status, plus any error [`load_str`] can return.
#[cfg(feature = "remote")]
pub fn load_url(url: &str) -> Result<Mapping> {
    log::debug!("Got URL: {url}");
    let network = |e: reqwest::Error| Error::Network {
        url: url.to_string(),
        message: e.to_string(),
    };
    let text = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(network)?;
    parse(&text, url)
}

/// Fetch and parse a YAML document over HTTP(S).
///
/// # Errors
///
/// Always returns [`Error::Network`]: this build has no HTTP client.
#[cfg(not(feature = "remote"))]
pub fn load_url(url: &str) -> Result<Mapping> {
    Err(Error::Network {
        url: url.to_string(),
        message: "remote loading is disabled (enable the `remote` feature)".to_string(),
    })
}

/// Load from either a URL or a local path, whichever `source` looks like.
///
/// # Errors
///
/// See [`load_url`] and [`load_path`].
pub fn load_source(source: &str) -> Result<Mapping> {
    if is_url(source) {
        load_url(source)
    } else {
        load_path(Path::new(source))
    }
}

/// Whether `source` is an `http`, `https` or `ftp` URL.
///
/// # Examples
///
/// ```
/// use yacman::codec::is_url;
///
/// assert!(is_url("https://example.com/schema.yaml"));
/// assert!(!is_url("/etc/app/schema.yaml"));
/// assert!(!is_url("C:\\configs\\schema.yaml"));
/// ```
#[must_use]
pub fn is_url(source: &str) -> bool {
    url::Url::parse(source)
        .map(|u| matches!(u.scheme(), "http" | "https" | "ftp"))
        .unwrap_or(false)
}

/// Render a mapping as block-style YAML text.
///
/// An empty mapping renders as `{}`. Output always ends with a newline.
///
/// # Errors
///
/// Returns [`Error::Yaml`] if a value cannot be serialized.
pub fn dump(data: &Mapping) -> Result<String> {
    Ok(serde_yaml::to_string(data)?)
}

/// Parse `text` and turn the document into a string-keyed mapping.
fn parse(text: &str, origin: &str) -> Result<Mapping> {
    if is_blank(text) {
        return Ok(Mapping::new());
    }
    match normalize_keys(serde_yaml::from_str(text)?)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        other => Err(Error::NotAMapping {
            origin: origin.to_string(),
            found: kind_of(&other).to_string(),
        }),
    }
}

/// A document holding nothing but comments and markers.
fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Recursively convert every mapping key to a string.
///
/// Numbers, booleans and nulls become their plain-text form. Sequence and
/// mapping keys cannot be addressed by string and are rejected.
///
/// # Errors
///
/// Returns [`Error::UnsupportedKey`] for non-scalar keys.
pub fn normalize_keys(value: Value) -> Result<Value> {
    Ok(match value {
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, val) in map {
                out.insert(Value::String(key_to_string(key)?), normalize_keys(val)?);
            }
            Value::Mapping(out)
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(normalize_keys)
                .collect::<Result<_>>()?,
        ),
        Value::Tagged(mut tagged) => {
            tagged.value = normalize_keys(tagged.value)?;
            Value::Tagged(tagged)
        }
        scalar => scalar,
    })
}

fn key_to_string(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => key_to_string(tagged.value),
        other => Err(Error::UnsupportedKey {
            key: serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_else(|_| kind_of(&other).to_string()),
        }),
    }
}

/// Human-readable name of a value's kind, for messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
