//! Package and file discovery.
//!
//! A Flow package keeps its Fusion code below `Resources/Private/Fusion`.
//! [`PackageResolver`] turns a package key like `Vendor.Site` into that
//! directory, [`list_files_recursively`] collects the files to process.

use std::path::{Path, PathBuf};

use mockall::automock;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{Error, InternalResult, config::DslSettings};

#[automock]
pub trait PackageResolver {
    /// Directory holding the Fusion files of `package_key`.
    fn fusion_directory(&self, package_key: &str) -> InternalResult<PathBuf>;
}

/// Resolves packages from explicit settings entries first, then by searching
/// the package roots for a directory named like the key.
#[derive(Debug, Clone)]
pub struct PackageManager {
    packages: Vec<(String, PathBuf)>,
    package_roots: Vec<PathBuf>,
    fusion_path: PathBuf,
}

impl PackageManager {
    pub fn from_settings(settings: &DslSettings) -> Self {
        Self {
            packages: settings
                .packages
                .iter()
                .map(|(key, path)| (key.clone(), path.clone()))
                .collect(),
            package_roots: settings.package_roots.clone(),
            fusion_path: settings.fusion_path.clone(),
        }
    }

    /// Root directory of the package, if it is available.
    #[instrument(level = "debug", skip(self))]
    pub fn package_path(&self, package_key: &str) -> Option<PathBuf> {
        if let Some((_, path)) = self.packages.iter().find(|(key, _)| key == package_key) {
            if path.is_dir() {
                return Some(path.clone());
            }
            warn!(path = %path.display(), "configured package path is not a directory");
        }

        self.package_roots
            .iter()
            .filter(|root| root.is_dir())
            .find_map(|root| find_package_in(root, package_key))
    }
}

// Flow keeps packages at `<root>/<Category>/<Package.Key>`, sometimes
// directly at `<root>/<Package.Key>`. Composer path repositories link them
// there from `DistributionPackages/`.
fn find_package_in(root: &Path, package_key: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == package_key)
        .map(|entry| entry.into_path())
}

impl PackageResolver for PackageManager {
    fn fusion_directory(&self, package_key: &str) -> InternalResult<PathBuf> {
        let package_path = self
            .package_path(package_key)
            .ok_or_else(|| Error::PackageNotFound(package_key.to_string()))?;

        let fusion_directory = package_path.join(&self.fusion_path);
        if !fusion_directory.is_dir() {
            return Err(Error::FusionDirectoryMissing(fusion_directory));
        }
        debug!(path = %fusion_directory.display(), "fusion directory resolved");
        Ok(fusion_directory)
    }
}

/// All files below `directory` whose extension is `extension`, in a stable
/// (file name sorted) order. Hidden files and directories are skipped,
/// symlinked directories are followed.
#[instrument(level = "debug")]
pub fn list_files_recursively(directory: &Path, extension: &str) -> InternalResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(directory)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = entry.map_err(|e| Error::ReadFailure {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| directory.to_path_buf()),
            source: e.into(),
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            files.push(entry.into_path());
        }
    }
    debug!(count = files.len(), "files listed");
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
