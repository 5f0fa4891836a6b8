//! Built distribution discovery and filename parsing.
//!
//! conda-build leaves finished packages under `<build-root>/<subdir>/`,
//! named `<name>-<version>-<build>.tar.bz2`. Package names may themselves
//! contain hyphens, so the version and build are taken from the right.

use std::path::{Path, PathBuf};

use crate::error::{ArtifactError, Result};

/// Archive suffix of the packages this tool handles
pub const ARCHIVE_SUFFIX: &str = ".tar.bz2";

/// Subdir holding platform-independent packages
pub const NOARCH_SUBDIR: &str = "noarch";

/// A built distribution on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// `<platform>/<filename>`, the key used on anaconda.org
    pub relative: String,
    /// Location on disk
    pub path: PathBuf,
    /// Platform subdir, e.g. `linux-64` or `noarch`
    pub platform: String,
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
    /// Build string
    pub build: String,
}

impl ArtifactRef {
    /// Parse a `<platform>/<name>-<version>-<build>.tar.bz2` path located under `build_root`
    pub fn parse(relative: &str, build_root: &Path) -> std::result::Result<Self, ArtifactError> {
        let (platform, name, version, build) = split_pkg(relative)?;
        Ok(Self {
            relative: relative.to_string(),
            path: build_root.join(relative),
            platform: platform.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            build: build.to_string(),
        })
    }

    /// File name without the platform directory
    pub fn filename(&self) -> &str {
        self.relative
            .rsplit_once('/')
            .map_or(self.relative.as_str(), |(_, file)| file)
    }
}

/// Split `<platform>/<name>-<version>-<build>.tar.bz2` into its four parts
pub fn split_pkg(pkg: &str) -> std::result::Result<(&str, &str, &str, &str), ArtifactError> {
    let stem = pkg
        .strip_suffix(ARCHIVE_SUFFIX)
        .ok_or_else(|| ArtifactError::UnsupportedSuffix {
            path: pkg.to_string(),
        })?;

    let (platform, file) = stem
        .split_once('/')
        .filter(|(platform, file)| !platform.is_empty() && !file.contains('/'))
        .ok_or_else(|| ArtifactError::InvalidLayout {
            path: pkg.to_string(),
        })?;

    let invalid_name = || ArtifactError::InvalidName {
        path: pkg.to_string(),
    };
    let (name_version, build) = file.rsplit_once('-').ok_or_else(invalid_name)?;
    let (name, version) = name_version.rsplit_once('-').ok_or_else(invalid_name)?;
    if name.is_empty() || version.is_empty() || build.is_empty() {
        return Err(invalid_name());
    }

    Ok((platform, name, version, build))
}

/// List built distributions under `<build_root>/noarch` and `<build_root>/<subdir>`.
///
/// Only files ending in `.tar.bz2` are returned, ordered by subdir then name.
/// A missing output directory contributes nothing.
pub fn built_distributions(build_root: &Path, subdir: &str) -> Result<Vec<ArtifactRef>> {
    let mut subdirs = vec![NOARCH_SUBDIR];
    if subdir != NOARCH_SUBDIR {
        subdirs.push(subdir);
    }

    let mut artifacts = Vec::new();
    for dir in subdirs {
        for file in list_archives(&build_root.join(dir))? {
            let relative = format!("{dir}/{file}");
            artifacts.push(ArtifactRef::parse(&relative, build_root)?);
        }
    }
    Ok(artifacts)
}

/// Archive file names directly inside `dir`, sorted
fn list_archives(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        log::debug!("Build output directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let dir_str = dir.to_str().ok_or_else(|| ArtifactError::NonUtf8Path {
        path: dir.to_path_buf(),
    })?;
    let pattern = format!("{}/*{ARCHIVE_SUFFIX}", glob::Pattern::escape(dir_str));
    let entries = glob::glob(&pattern).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(std::io::Error::from)?;
        if !path.is_file() {
            continue;
        }
        let file = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| ArtifactError::NonUtf8Path { path: path.clone() })?;
        files.push(file.to_string());
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_platform_name_version_build() {
        assert_eq!(
            split_pkg("linux-64/foo-1.0-0.tar.bz2"),
            Ok(("linux-64", "foo", "1.0", "0"))
        );
    }

    #[test]
    fn hyphenated_names_split_from_the_right() {
        assert_eq!(
            split_pkg("noarch/conda-forge-pinning-2024.01.01-hd8ed1ab_0.tar.bz2"),
            Ok(("noarch", "conda-forge-pinning", "2024.01.01", "hd8ed1ab_0"))
        );
    }

    #[test]
    fn rejects_other_suffixes() {
        for path in ["linux-64/foo-1.0-0.conda", "linux-64/foo-1.0-0.tar.gz", "foo"] {
            assert!(matches!(
                split_pkg(path),
                Err(ArtifactError::UnsupportedSuffix { .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_layouts() {
        assert!(matches!(
            split_pkg("foo-1.0-0.tar.bz2"),
            Err(ArtifactError::InvalidLayout { .. })
        ));
        assert!(matches!(
            split_pkg("a/linux-64/foo-1.0-0.tar.bz2"),
            Err(ArtifactError::InvalidLayout { .. })
        ));
        assert!(matches!(
            split_pkg("linux-64/foo-1.0.tar.bz2"),
            Err(ArtifactError::InvalidName { .. })
        ));
        assert!(matches!(
            split_pkg("linux-64/-1.0-0.tar.bz2"),
            Err(ArtifactError::InvalidName { .. })
        ));
    }

    #[test]
    fn artifact_ref_carries_paths() {
        let root = Path::new("/bld");
        let artifact = ArtifactRef::parse("linux-64/bar-2.0-py_0.tar.bz2", root);
        let artifact = match artifact {
            Ok(a) => a,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(artifact.path, root.join("linux-64/bar-2.0-py_0.tar.bz2"));
        assert_eq!(artifact.filename(), "bar-2.0-py_0.tar.bz2");
        assert_eq!(artifact.build, "py_0");
    }
}
