//! hexagen scaffolds a hexagonal Go service: a fixed directory layout,
//! `go.mod`, a Makefile and a handful of rendered Go sources.

/// Command-line interface module for the hexagen application
pub mod cli;

/// Generation settings and how flags, answers and prompts are merged
pub mod config;

/// Error types and handling for the hexagen application
pub mod error;

/// External processes: dependency install and `hexagen-<name>` plugins
pub mod external;

/// Logger setup
pub mod logger;

/// Directory and template manifests
pub mod manifest;

/// Core generation of the project tree
pub mod materializer;

/// User input and interaction handling
pub mod prompt;

/// go.mod and Makefile contents
pub mod static_files;

/// Template storage and rendering
pub mod template;
