//! Locates and loads the press CMYK ICC profile.

use std::fs;
use std::path::{Path, PathBuf};

use moxcms::{ColorProfile, DataColorSpace};

/// File name of the press profile this tool proofs against.
pub const PROFILE_FILE_NAME: &str = "JapanColor2001Coated.icc";

/// Ordered candidate paths searched for the press profile.
const CANDIDATE_PATHS: &[&str] = &[
    // Adobe's recommended-profiles directory.
    "/Library/Application Support/Adobe/Color/Profiles/Recommended/JapanColor2001Coated.icc",
    // macOS ColorSync system profiles.
    "/System/Library/ColorSync/Profiles/JapanColor2001Coated.icc",
    // Linux system-wide ICC profiles.
    "/usr/share/color/icc/JapanColor2001Coated.icc",
    // Application-local profile directory.
    "profiles/JapanColor2001Coated.icc",
    // Current working directory.
    "JapanColor2001Coated.icc",
];

/// Where the press profile is resolved from.
#[derive(Clone, Debug, Default)]
pub struct ProfileSource {
    /// Explicit profile path; skips the search when set.
    pub path: Option<PathBuf>,
    /// Extra directories searched before the built-in candidates.
    pub search: Vec<PathBuf>,
}

/// Returns the first existing candidate path for the press
/// profile, checking `extra_dirs` before the built-in candidates.
///
/// Existence checks only; nothing is cached, so every conversion
/// re-resolves the profile.
pub fn locate(extra_dirs: &[PathBuf]) -> Option<PathBuf> {
    extra_dirs
        .iter()
        .map(|dir| dir.join(PROFILE_FILE_NAME))
        .chain(CANDIDATE_PATHS.iter().map(PathBuf::from))
        .find(|path| path.exists())
}

/// The CMYK side of every press transform.
pub enum PressProfile {
    /// A profile loaded from an ICC file on disk.
    Icc(ColorProfile),
    /// Built-in device-ink fallback, used when no profile loads.
    Device,
}

impl PressProfile {
    /// Resolves the press profile from `source`.
    ///
    /// Never fails: a missing, unreadable, or non-CMYK profile
    /// logs a warning and resolves to [PressProfile::Device].
    pub fn resolve(source: &ProfileSource) -> Self {
        let path = match &source.path {
            Some(path) => Some(path.clone()),
            None => locate(&source.search),
        };

        let Some(path) = path else {
            tracing::warn!(
                "{PROFILE_FILE_NAME} not found; using the built-in device CMYK fallback"
            );
            return Self::Device;
        };

        match load(&path) {
            Ok(profile) => Self::Icc(profile),
            Err(error) => {
                tracing::warn!(
                    "failed to load {}: {error}; using the built-in device CMYK fallback",
                    path.display()
                );
                Self::Device
            }
        }
    }
}

impl std::fmt::Debug for PressProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PressProfile::Icc(_) => f.debug_struct("Icc").finish_non_exhaustive(),
            PressProfile::Device => write!(f, "Device"),
        }
    }
}

/// Loads and validates a CMYK ICC profile from `path`.
fn load(path: &Path) -> Result<ColorProfile, LoadError> {
    let data = fs::read(path).map_err(LoadError::Io)?;
    let profile = ColorProfile::new_from_slice(&data).map_err(LoadError::Malformed)?;

    if profile.color_space != DataColorSpace::Cmyk {
        return Err(LoadError::NotCmyk);
    }

    Ok(profile)
}

/// An error that occurs while loading a press profile.
#[derive(Debug)]
enum LoadError {
    /// The profile file couldn't be read.
    Io(std::io::Error),
    /// The file wasn't a parseable ICC profile.
    Malformed(moxcms::CmsError),
    /// The profile's data color space isn't CMYK.
    NotCmyk,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(error) => write!(f, "{error}"),
            LoadError::Malformed(error) => write!(f, "malformed ICC profile: {error:?}"),
            LoadError::NotCmyk => write!(f, "profile data color space is not CMYK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_profile_in_extra_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);
        fs::write(&path, b"stub").unwrap();

        let found = locate(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn ignores_extra_dirs_without_the_profile() {
        let dir = tempfile::tempdir().unwrap();
        // An extra directory without the profile doesn't change
        // what the built-in candidates resolve to.
        assert_eq!(locate(&[dir.path().to_path_buf()]), locate(&[]));
    }

    #[test_log::test]
    fn missing_explicit_path_falls_back() {
        let source = ProfileSource {
            path: Some(PathBuf::from("/nonexistent/press-profile.icc")),
            search: Vec::new(),
        };
        assert!(matches!(
            PressProfile::resolve(&source),
            PressProfile::Device
        ));
    }

    #[test_log::test]
    fn corrupt_profile_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);
        fs::write(&path, b"definitely not an ICC profile").unwrap();

        let source = ProfileSource {
            path: Some(path),
            search: Vec::new(),
        };
        assert!(matches!(
            PressProfile::resolve(&source),
            PressProfile::Device
        ));
    }
}
