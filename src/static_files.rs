//! Fixed files written directly under the project root: the Go module
//! descriptor and the Makefile.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// File name of the module descriptor.
pub const MODULE_FILE: &str = "go.mod";
/// File name of the build-automation file.
pub const BUILD_FILE: &str = "Makefile";
/// Go toolchain version declared in the module descriptor.
pub const GO_VERSION: &str = "1.22.0";

/// Contents of `go.mod` for `module`.
pub fn module_descriptor(module: &str) -> String {
    format!("module {module}\n\ngo {GO_VERSION}\n")
}

/// Contents of the Makefile, with `port` as the default `PORT`.
pub fn build_file(port: &str) -> String {
    format!(
        "PORT ?= {port}

run:
\tgo run ./cmd/main.go

build:
\tgo build -o bin/app ./cmd/main.go

test:
\tgo test ./...

setup:
\tgo mod tidy
"
    )
}

fn write_static(root: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(name);
    debug!("Writing file: {}", path.display());
    fs::write(&path, content).map_err(|source| Error::StaticFileWriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes `go.mod` under `root`.
pub fn write_module_descriptor(root: &Path, module: &str) -> Result<PathBuf> {
    write_static(root, MODULE_FILE, &module_descriptor(module))
}

/// Writes the Makefile under `root`.
pub fn write_build_file(root: &Path, port: &str) -> Result<PathBuf> {
    write_static(root, BUILD_FILE, &build_file(port))
}
