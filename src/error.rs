//! Error handling for hexagen.
//! Defines the error type and result alias used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for hexagen operations.
///
/// Every variant is terminal for the current invocation. Best-effort steps
/// (clean, marker files) never produce one of these; their failures are
/// collected in [`crate::materializer::MaterializeReport`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The target root could not be created or resolved.
    #[error("Cannot create project root '{}': {source}.", .path.display())]
    RootCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest entry refers to a template the store does not contain.
    #[error("Template '{0}' not found.")]
    TemplateNotFound(String),

    /// Template source failed to compile or references an unknown placeholder.
    #[error("Template syntax error in '{name}': {reason}.")]
    TemplateSyntaxError { name: String, reason: String },

    /// Rendering or writing a rendered file failed.
    #[error("Failed to render '{name}' into '{}': {reason}.", .target.display())]
    RenderFailed {
        name: String,
        target: PathBuf,
        reason: String,
    },

    /// A renderer produced bytes that are not valid UTF-8.
    #[error("Rendered output of '{name}' is not valid UTF-8: {reason}.")]
    NonUtf8Output { name: String, reason: String },

    /// Writing the module descriptor or the build file failed.
    #[error("Failed to write '{}': {source}.", .path.display())]
    StaticFileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest path is absolute or escapes the project root.
    #[error("Invalid manifest path '{0}': paths must be relative and stay inside the root.")]
    InvalidManifestPath(String),

    /// Preloaded answers could not be parsed.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Interactive prompt failed.
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// No `hexagen-<name>` executable was found on `PATH`.
    #[error("No such command or plugin: '{0}'.")]
    PluginNotFound(String),

    /// An external command failed to start or exited unsuccessfully.
    #[error("External command '{command}' failed: {reason}.")]
    ExternalCommandError { command: String, reason: String },

    /// Errors raised by the template engine while rendering.
    #[error("Template engine error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("Error: {err}");
    std::process::exit(1);
}
