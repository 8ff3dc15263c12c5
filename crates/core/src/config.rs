//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the mapping layer. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent behaviour in multi-threaded
//! runtimes and test harnesses.

use crate::constants::{
    DEFAULT_FIELDS, DEFAULT_LIMIT, DEFAULT_OFFSET, DEFAULT_PATH_SEPARATOR, DEFAULT_SEED_FILE,
};
use crate::{BoxError, BoxResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    path_separator: String,
    default_limit: String,
    default_offset: String,
    default_fields: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::InvalidInput` if the separator is empty or the default limit/offset
    /// are not unsigned integers.
    pub fn new(
        path_separator: String,
        default_limit: String,
        default_offset: String,
        default_fields: String,
    ) -> BoxResult<Self> {
        if path_separator.is_empty() {
            return Err(BoxError::InvalidInput(
                "path_separator cannot be empty".into(),
            ));
        }

        for (name, value) in [("limit", &default_limit), ("offset", &default_offset)] {
            if value.trim().parse::<u64>().is_err() {
                return Err(BoxError::InvalidInput(format!(
                    "default {name} must be an unsigned integer, got {value:?}"
                )));
            }
        }

        Ok(Self {
            path_separator,
            default_limit,
            default_offset,
            default_fields,
        })
    }

    pub fn path_separator(&self) -> &str {
        &self.path_separator
    }

    pub fn default_limit(&self) -> &str {
        &self.default_limit
    }

    pub fn default_offset(&self) -> &str {
        &self.default_offset
    }

    pub fn default_fields(&self) -> &str {
        &self.default_fields
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR.into(),
            default_limit: DEFAULT_LIMIT.into(),
            default_offset: DEFAULT_OFFSET.into(),
            default_fields: DEFAULT_FIELDS.into(),
        }
    }
}

/// Parse the path separator from an optional string value.
///
/// If `value` is `None` or empty, returns [`DEFAULT_PATH_SEPARATOR`]. Surrounding whitespace is
/// kept only when the value is nothing but whitespace.
pub fn path_separator_from_env_value(value: Option<String>) -> String {
    match value {
        Some(v) if v.is_empty() => DEFAULT_PATH_SEPARATOR.into(),
        Some(v) if v.trim().is_empty() => v,
        Some(v) => v.trim().to_string(),
        None => DEFAULT_PATH_SEPARATOR.into(),
    }
}

/// Resolve the repository seed file without reading environment variables.
///
/// If `override_file` is provided, it must be an existing file. Otherwise this searches for
/// `fixtures/repository.yaml` relative to the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR`.
pub fn resolve_seed_file(override_file: Option<PathBuf>) -> BoxResult<PathBuf> {
    if let Some(seed_file) = override_file {
        if seed_file.is_file() {
            return Ok(seed_file);
        }
        return Err(BoxError::InvalidInput(format!(
            "BOX_SEED_FILE override is not a file: {}",
            seed_file.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_SEED_FILE);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_SEED_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(BoxError::InvalidInput(format!(
        "could not locate {DEFAULT_SEED_FILE}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_numeric_default_limit() {
        let err = CoreConfig::new("/".into(), "ten".into(), "0".into(), "*".into())
            .expect_err("non-numeric limit should be rejected");
        assert!(matches!(err, BoxError::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_separator() {
        assert!(CoreConfig::new(String::new(), "100".into(), "0".into(), "*".into()).is_err());
    }

    #[test]
    fn separator_defaults_when_unset_or_empty() {
        assert_eq!(path_separator_from_env_value(None), "/");
        assert_eq!(path_separator_from_env_value(Some(String::new())), "/");
        assert_eq!(path_separator_from_env_value(Some(" \\ ".into())), "\\");
    }

    #[test]
    fn seed_override_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(resolve_seed_file(Some(missing)).is_err());

        let present = dir.path().join("seed.yaml");
        std::fs::write(&present, "documents: []\n").unwrap();
        assert_eq!(resolve_seed_file(Some(present.clone())).unwrap(), present);
    }

    #[test]
    fn bundled_seed_is_found_from_manifest_dir() {
        let seed = resolve_seed_file(None).expect("bundled seed should resolve");
        assert!(seed.ends_with(DEFAULT_SEED_FILE));
    }
}
