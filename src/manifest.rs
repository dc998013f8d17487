//! Static description of the generated project layout.
//! Directory and template manifests are ordered lists fixed at build time;
//! the order is preserved so repeated runs produce identical trees.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Directories created under the project root, in creation order.
pub const DIRECTORIES: [&str; 13] = [
    "cmd",
    "commons/constants",
    "commons/error",
    "commons/utils",
    "config/constants",
    "config/env",
    "config/init",
    "recievers",
    "services/serviceName/service_init",
    "services/serviceName/data",
    "services/serviceName/internal",
    "services/serviceName/routes",
    "services/serviceName/utils",
];

/// `(output path, template id)` pairs rendered under the project root.
pub const TEMPLATES: [(&str, &str); 4] = [
    ("cmd/main.go", "app.go.tmpl"),
    ("services/serviceName/routes/router.go", "router.go.tmpl"),
    ("config/init/serverConfig.go", "serverConfig.go.tmpl"),
    ("commons/utils/logger.go", "logger.go.tmpl"),
];

/// Checks that `path` is non-empty, relative, and never climbs above the root.
pub fn is_contained_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return false;
    }
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn validated(path: &str) -> Result<PathBuf> {
    if is_contained_path(path) {
        Ok(PathBuf::from(path))
    } else {
        Err(Error::InvalidManifestPath(path.to_string()))
    }
}

/// Ordered set of relative directory paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryManifest {
    dirs: Vec<PathBuf>,
}

impl DirectoryManifest {
    /// Builds a manifest, rejecting absolute or escaping paths.
    pub fn new<I, S>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dirs = dirs
            .into_iter()
            .map(|d| validated(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { dirs })
    }

    /// The built-in hexagonal service layout.
    pub fn standard() -> Self {
        Self {
            dirs: DIRECTORIES.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }
}

/// A single rendered file: where it goes and which template produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub output: PathBuf,
    pub template: String,
}

/// Ordered set of `(output path, template id)` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifest {
    entries: Vec<TemplateEntry>,
}

impl TemplateManifest {
    /// Builds a manifest, rejecting absolute or escaping output paths.
    pub fn new<I, O, T>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (O, T)>,
        O: AsRef<str>,
        T: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(output, template)| {
                Ok(TemplateEntry {
                    output: validated(output.as_ref())?,
                    template: template.into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// The built-in set of Go sources.
    pub fn standard() -> Self {
        Self {
            entries: TEMPLATES
                .iter()
                .map(|(output, template)| TemplateEntry {
                    output: PathBuf::from(output),
                    template: template.to_string(),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter()
    }
}
