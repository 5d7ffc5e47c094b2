// src/core/props.rs

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::Scope;

#[derive(Error, Debug)]
pub enum PropsError {
    #[error("Filesystem error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Property '{key}' in '{path}' is not a string value.")]
    NonStringValue { path: String, key: String },
}

/// A property-file context: the logical namespace a file of definitions
/// belongs to (e.g. `aliases`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
    name: String,
}

impl Context {
    pub fn named(text: &str) -> Self {
        Self {
            name: text.trim().to_lowercase(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A resolved property: either a present (name, value) pair or the
/// distinguished empty marker for an absent key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prop {
    Value { name: String, value: String },
    Empty,
}

impl Prop {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value { value, .. } => Some(value),
            Self::Empty => None,
        }
    }
}

/// The file holding `context` definitions for `scope` under `dir`:
/// `<context>.toml` for the default scope, `<context>.<scope>.toml` otherwise.
fn file_for(context: &Context, scope: &Scope, dir: &Path) -> std::path::PathBuf {
    if scope.is_default() {
        dir.join(format!("{}.toml", context))
    } else {
        dir.join(format!("{}.{}.toml", context, scope))
    }
}

/// Loads all properties in `context` for `scope` at directory `dir`.
/// A missing file is an empty mapping; absence is not an error.
pub fn get_all(
    context: &Context,
    scope: &Scope,
    dir: &Path,
) -> Result<HashMap<String, String>, PropsError> {
    let path = file_for(context, scope, dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!(
                "No property file at '{}'; treating as empty.",
                path.display()
            );
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(PropsError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };

    let table: toml::Table = toml::from_str(&content).map_err(|e| PropsError::TomlParse {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut props = HashMap::with_capacity(table.len());
    for (key, value) in table {
        match value {
            toml::Value::String(s) => {
                props.insert(key, s);
            }
            _ => {
                return Err(PropsError::NonStringValue {
                    path: path.display().to_string(),
                    key,
                });
            }
        }
    }
    log::debug!(
        "Loaded {} properties from '{}' (context '{}', scope '{}').",
        props.len(),
        path.display(),
        context,
        scope
    );
    Ok(props)
}

/// Resolves a single scope-qualified property, or `Prop::Empty` if absent.
pub fn get(name: &str, context: &Context, scope: &Scope, dir: &Path) -> Result<Prop, PropsError> {
    let all = get_all(context, scope, dir)?;
    Ok(match all.get(name) {
        Some(value) => Prop::Value {
            name: name.to_string(),
            value: value.clone(),
        },
        None => Prop::Empty,
    })
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_get_all_default_scope() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "aliases.toml",
            "clean = '\"rm -rf target\"'\ncompile = 'clean compiler.jar'\n",
        );
        let props = get_all(&Context::named("aliases"), &Scope::default(), dir.path()).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("clean").unwrap(), "\"rm -rf target\"");
        assert_eq!(props.get("compile").unwrap(), "clean compiler.jar");
    }

    #[test]
    fn test_get_all_named_scope_uses_scoped_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aliases.toml", "clean = 'rm'\n");
        write_file(dir.path(), "aliases.test.toml", "remove = 'remove-1.0.jar'\n");
        let props = get_all(&Context::named("aliases"), &Scope::named("test"), dir.path()).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("remove").unwrap(), "remove-1.0.jar");
    }

    #[test]
    fn test_missing_file_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let props = get_all(&Context::named("aliases"), &Scope::default(), dir.path()).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn test_get_single_prop_and_empty_marker() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aliases.toml", "clean = 'rm -rf target'\n");
        let context = Context::named("aliases");
        let prop = get("clean", &context, &Scope::default(), dir.path()).unwrap();
        assert_eq!(prop.value(), Some("rm -rf target"));
        let missing = get("compile", &context, &Scope::default(), dir.path()).unwrap();
        assert!(missing.is_empty());
        assert_eq!(missing.value(), None);
    }

    #[test]
    fn test_non_string_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aliases.toml", "clean = 3\n");
        let err =
            get_all(&Context::named("aliases"), &Scope::default(), dir.path()).unwrap_err();
        assert!(matches!(err, PropsError::NonStringValue { .. }));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "aliases.toml", "clean = \n");
        let err =
            get_all(&Context::named("aliases"), &Scope::default(), dir.path()).unwrap_err();
        assert!(matches!(err, PropsError::TomlParse { .. }));
    }
}
