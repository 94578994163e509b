//! Home-directory and environment-variable expansion of string values.
//!
//! Expansion always produces a new value; stored configuration is never
//! rewritten. Variables that are not set are left in place literally, the
//! way a shell leaves `$UNSET` alone under `set +u`.

use std::borrow::Cow;
use std::env;

use serde_yaml::{Mapping, Value};

/// Expand `~` and `$VAR` / `${VAR}` references in a single string.
///
/// `~` is only expanded at the start of the string, alone or followed by a
/// path separator. `~user` forms are returned unchanged.
///
/// # Examples
///
/// ```
/// use yacman::expand::expand_str;
///
/// std::env::set_var("YACMAN_DOC_DIR", "/srv/data");
/// assert_eq!(expand_str("$YACMAN_DOC_DIR/genomes"), "/srv/data/genomes");
/// assert_eq!(expand_str("$YACMAN_DOC_UNSET_VAR/x"), "$YACMAN_DOC_UNSET_VAR/x");
/// ```
#[must_use]
pub fn expand_str(input: &str) -> String {
    let with_home = expand_tilde(input);
    shellexpand::env_with_context_no_errors(with_home.as_ref(), |var: &str| env::var(var).ok())
        .into_owned()
}

fn expand_tilde(input: &str) -> Cow<'_, str> {
    let rest = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return Cow::Borrowed(input),
    };
    match home::home_dir() {
        Some(home) => Cow::Owned(format!("{}{rest}", home.display())),
        None => Cow::Borrowed(input),
    }
}

/// Return an expanded copy of `value`.
///
/// Strings are expanded, mappings are rebuilt with every value expanded
/// recursively, and all other values are cloned unchanged.
///
/// # Examples
///
/// ```
/// use serde_yaml::Value;
/// use yacman::expand::expand;
///
/// let raw = Value::from("~");
/// let expanded = expand(&raw);
/// assert_eq!(raw, Value::from("~"));
/// assert_ne!(expanded, raw);
/// ```
#[must_use]
pub fn expand(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(expand_str(s)),
        Value::Mapping(map) => Value::Mapping(expand_mapping(map)),
        other => other.clone(),
    }
}

/// Return a copy of `map` with every value passed through [`expand`].
#[must_use]
pub fn expand_mapping(map: &Mapping) -> Mapping {
    map.iter().map(|(k, v)| (k.clone(), expand(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn home() -> String {
        home::home_dir().unwrap().display().to_string()
    }

    #[test]
    fn test_tilde_alone() {
        assert_eq!(expand_str("~"), home());
    }

    #[test]
    fn test_tilde_with_path() {
        assert_eq!(expand_str("~/project"), format!("{}/project", home()));
    }

    #[test]
    fn test_tilde_user_unchanged() {
        assert_eq!(expand_str("~someone/x"), "~someone/x");
        assert_eq!(expand_str("a/~/b"), "a/~/b");
    }

    #[test]
    #[serial]
    fn test_env_var_forms() {
        env::set_var("BRAHMS", "/dummy/path/example");
        assert_eq!(expand_str("$BRAHMS"), "/dummy/path/example");
        assert_eq!(expand_str("${BRAHMS}/sub"), "/dummy/path/example/sub");
    }

    #[test]
    #[serial]
    fn test_unset_var_passes_through() {
        env::remove_var("YACMAN_TEST_DEFINITELY_UNSET");
        assert_eq!(
            expand_str("$YACMAN_TEST_DEFINITELY_UNSET/data"),
            "$YACMAN_TEST_DEFINITELY_UNSET/data"
        );
    }

    #[test]
    #[serial]
    fn test_nested_mapping_expanded_without_mutation() {
        env::set_var("BRAHMS", "/dummy/path/example");
        let mut inner = Mapping::new();
        inner.insert("p".into(), "$BRAHMS".into());
        let mut outer = Mapping::new();
        outer.insert("test".into(), Value::Mapping(inner));
        outer.insert("n".into(), 5.into());

        let expanded = expand_mapping(&outer);
        assert_eq!(
            expanded["test"]["p"],
            Value::from("/dummy/path/example")
        );
        assert_eq!(outer["test"]["p"], Value::from("$BRAHMS"));
        assert_eq!(expanded["n"], Value::from(5));
    }

    #[test]
    fn test_non_strings_pass_through() {
        let seq = Value::Sequence(vec!["~".into()]);
        assert_eq!(expand(&seq), seq);
        assert_eq!(expand(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(expand(&Value::Null), Value::Null);
    }
}
