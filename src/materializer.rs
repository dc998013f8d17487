//! Project materialization: turns a [`GenerationConfig`] and the manifests
//! into a populated directory tree.
//!
//! Steps run strictly in order:
//! 1. create the root (fatal on failure)
//! 2. optionally purge its contents (best-effort)
//! 3. create manifest directories and optional `.gitkeep` markers (best-effort)
//! 4. write `go.mod` and the Makefile (fatal on failure)
//! 5. render every template entry (fatal on failure)
//!
//! Best-effort failures are not logged here; they are returned in the
//! [`MaterializeReport`] for the caller to report.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::manifest::{DirectoryManifest, TemplateEntry, TemplateManifest};
use crate::static_files::{write_build_file, write_module_descriptor};
use crate::template::{
    EmbeddedTemplates, MiniJinjaRenderer, SubstitutionContext, TemplateRenderer, TemplateStore,
};

/// Name of the empty marker file written into manifest directories.
pub const MARKER_FILE: &str = ".gitkeep";

/// Best-effort step an entry failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    CreateDirectory,
    Marker,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Clean => write!(f, "clean"),
            Step::CreateDirectory => write!(f, "create directory"),
            Step::Marker => write!(f, "write marker"),
        }
    }
}

/// A swallowed failure from a best-effort step.
#[derive(Debug)]
pub struct SkippedEntry {
    pub step: Step,
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for '{}': {}", self.step, self.path.display(), self.error)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Absolute project root.
    pub root: PathBuf,
    /// Files written, in write order. Marker files are not listed.
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

/// Resolves `root` against the current directory without touching the filesystem.
pub fn resolve_root<P: AsRef<Path>>(root: P) -> io::Result<PathBuf> {
    let root = root.as_ref();
    if root.is_absolute() {
        Ok(root.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(root))
    }
}

/// Builds project trees from manifests, using a renderer and a template store.
pub struct Materializer<'a> {
    renderer: &'a dyn TemplateRenderer,
    store: &'a dyn TemplateStore,
}

impl<'a> Materializer<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, store: &'a dyn TemplateStore) -> Self {
        Self { renderer, store }
    }

    /// Runs all generation steps for `config`.
    ///
    /// # Errors
    /// * `Error::RootCreationFailed` if the root cannot be resolved or created
    /// * `Error::StaticFileWriteFailed` if `go.mod` or the Makefile cannot be written
    /// * `Error::TemplateNotFound`, `Error::TemplateSyntaxError` or
    ///   `Error::RenderFailed` for the first failing template entry
    pub fn materialize(
        &self,
        config: &GenerationConfig,
        directories: &DirectoryManifest,
        templates: &TemplateManifest,
    ) -> Result<MaterializeReport> {
        let root = prepare_root(&config.root)?;
        let mut report = MaterializeReport {
            root: root.clone(),
            ..Default::default()
        };

        if config.clean {
            clean_root(&root, &mut report.skipped);
        }

        create_directories(&root, directories, config.gitkeep, &mut report.skipped);

        report.files.push(write_module_descriptor(&root, &config.module)?);
        report.files.push(write_build_file(&root, &config.port)?);

        let context = config.substitution_context();
        for entry in templates.iter() {
            report.files.push(self.render_entry(&root, entry, &context)?);
        }

        Ok(report)
    }

    fn render_entry(
        &self,
        root: &Path,
        entry: &TemplateEntry,
        context: &SubstitutionContext,
    ) -> Result<PathBuf> {
        let name = entry.template.as_str();
        let source = self
            .store
            .get(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;
        self.renderer.compile(name, source, context)?;

        let target = root.join(&entry.output);
        let render_failed = |reason: String| Error::RenderFailed {
            name: name.to_string(),
            target: target.clone(),
            reason,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| render_failed(e.to_string()))?;
        }

        debug!("Rendering {} into {}", name, target.display());
        let file = File::create(&target).map_err(|e| render_failed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        self.renderer
            .render_to(name, source, context, &mut writer)
            .map_err(|e| match e {
                Error::TemplateSyntaxError { .. } => e,
                other => render_failed(other.to_string()),
            })?;
        writer.flush().map_err(|e| render_failed(e.to_string()))?;

        Ok(target)
    }
}

/// Materializes the built-in layout with the bundled templates.
pub fn materialize(
    config: &GenerationConfig,
    directories: &DirectoryManifest,
    templates: &TemplateManifest,
) -> Result<MaterializeReport> {
    let renderer = MiniJinjaRenderer::new();
    let store = EmbeddedTemplates::new();
    Materializer::new(&renderer, &store).materialize(config, directories, templates)
}

fn prepare_root(root: &Path) -> Result<PathBuf> {
    let root_creation_failed = |source: io::Error| Error::RootCreationFailed {
        path: root.to_path_buf(),
        source,
    };
    let abs_root = resolve_root(root).map_err(root_creation_failed)?;
    debug!("Preparing project root {}", abs_root.display());
    fs::create_dir_all(&abs_root).map_err(root_creation_failed)?;
    Ok(abs_root)
}

fn clean_root(root: &Path, skipped: &mut Vec<SkippedEntry>) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) => {
            skipped.push(SkippedEntry {
                step: Step::Clean,
                path: root.to_path_buf(),
                error,
            });
            return;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(error) => {
                skipped.push(SkippedEntry {
                    step: Step::Clean,
                    path: root.to_path_buf(),
                    error,
                });
                continue;
            }
        };
        debug!("Removing {}", path.display());
        // symlink_metadata so a link to a directory is unlinked, not followed
        let removed = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        if let Err(error) = removed {
            skipped.push(SkippedEntry {
                step: Step::Clean,
                path,
                error,
            });
        }
    }
}

fn create_directories(
    root: &Path,
    directories: &DirectoryManifest,
    gitkeep: bool,
    skipped: &mut Vec<SkippedEntry>,
) {
    for dir in directories.iter() {
        let path = root.join(dir);
        debug!("Creating directory {}", path.display());
        if let Err(error) = fs::create_dir_all(&path) {
            skipped.push(SkippedEntry {
                step: Step::CreateDirectory,
                path,
                error,
            });
            continue;
        }

        if gitkeep {
            let marker = path.join(MARKER_FILE);
            if let Err(error) = fs::write(&marker, b"") {
                skipped.push(SkippedEntry {
                    step: Step::Marker,
                    path: marker,
                    error,
                });
            }
        }
    }
}
