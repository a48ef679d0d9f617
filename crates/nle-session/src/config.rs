//! Session configuration.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the game library, read by
/// [`SessionConfig::from_env`].
pub const DLPATH_ENV: &str = "NLE_DLPATH";

/// Environment variable naming the loader library, read by
/// [`SessionConfig::with_library_from_env`].
pub const LIBRARY_ENV: &str = "NLE_LIBRARY";

/// Where to find the engine.
///
/// Two libraries are involved. The loader (`library`) exports the
/// `nle_start`/`nle_step`/`nle_reset`/`nle_end` entry points; its
/// `nle_start` receives `dlpath` and opens the game library from there on
/// every start. The two must be distinct files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Game library handed to the loader's start entry point.
    pub dlpath: PathBuf,
    /// Loader library exporting the `nle_*` entry points.
    pub library: Option<PathBuf>,
}

impl SessionConfig {
    /// A config for the game library at `dlpath` with no loader set yet.
    pub fn new(dlpath: impl Into<PathBuf>) -> Self {
        Self {
            dlpath: dlpath.into(),
            library: None,
        }
    }

    /// Resolves the entry points from `library`.
    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Fills an unset loader path from `NLE_LIBRARY`, if that is set.
    pub fn with_library_from_env(mut self) -> Self {
        if self.library.is_none() {
            self.library = std::env::var_os(LIBRARY_ENV).map(PathBuf::from);
        }
        self
    }

    /// Reads the game library from `NLE_DLPATH` and the loader from
    /// `NLE_LIBRARY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dlpath = std::env::var_os(DLPATH_ENV).ok_or(ConfigError::MissingEnv(DLPATH_ENV))?;
        Ok(Self::new(dlpath).with_library_from_env())
    }

    /// The loader library the entry points are resolved from.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingLibrary`] if no loader was configured.
    pub fn library_path(&self) -> Result<&Path, ConfigError> {
        self.library.as_deref().ok_or(ConfigError::MissingLibrary)
    }

    /// Checks that both paths are set, non-empty, C-compatible, exist, and
    /// name different files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dlpath_cstring()?;
        let library = self.library_path()?;
        for path in [self.dlpath.as_path(), library] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath);
            }
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }
        let same = match (library.canonicalize(), self.dlpath.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => library == self.dlpath,
        };
        if same {
            return Err(ConfigError::LoaderIsGameLibrary(library.to_path_buf()));
        }
        Ok(())
    }

    /// `dlpath` as a NUL-terminated string for the engine.
    pub fn dlpath_cstring(&self) -> Result<CString, ConfigError> {
        let bytes = self.dlpath.as_os_str().as_encoded_bytes();
        if bytes.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        CString::new(bytes).map_err(|_| ConfigError::InteriorNul)
    }
}
