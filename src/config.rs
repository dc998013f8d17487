//! Generation configuration and its resolution.
//! Values are merged in order: command-line flags, preloaded answers,
//! interactive prompts. Defaults fill whatever is still empty.

use std::io::Read;
use std::path::PathBuf;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::template::{SubstitutionContext, MODULE_KEY, PORT_KEY};

/// Default project root.
pub const DEFAULT_ROOT: &str = ".";
/// Module identifier used when none was supplied.
pub const DEFAULT_MODULE: &str = "service.com/service";
/// Default server port.
pub const DEFAULT_PORT: &str = "8080";

/// Everything the materializer needs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub root: PathBuf,
    pub module: String,
    pub port: String,
    /// Write `.gitkeep` into every manifest directory.
    pub gitkeep: bool,
    /// Remove existing root contents before generating.
    pub clean: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            module: DEFAULT_MODULE.to_string(),
            port: DEFAULT_PORT.to_string(),
            gitkeep: false,
            clean: false,
        }
    }
}

impl GenerationConfig {
    /// Placeholder values exposed to templates.
    pub fn substitution_context(&self) -> SubstitutionContext {
        SubstitutionContext::new()
            .with(MODULE_KEY, self.module.as_str())
            .with(PORT_KEY, self.port.as_str())
    }
}

/// Answers supplied up front, e.g. as JSON on stdin.
///
/// Any field left out keeps the value coming from the flags.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Answers {
    pub root: Option<PathBuf>,
    pub module: Option<String>,
    pub port: Option<String>,
    pub gitkeep: Option<bool>,
    pub clean: Option<bool>,
}

/// Parses preloaded answers. Blank input yields no answers.
///
/// # Errors
/// * `Error::ConfigError` if the input is not a valid answers object
pub fn parse_answers(content: &str) -> Result<Answers> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(Answers::default());
    }
    serde_json::from_str(content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse answers as JSON: {e}")))
}

/// Reads preloaded answers from stdin when `take_from_stdin` is set.
pub fn get_answers_from(take_from_stdin: bool) -> Result<Answers> {
    if !take_from_stdin {
        return Ok(Answers::default());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_answers(&buffer)
}

/// Merges flags, preloaded answers and (optionally) interactive prompts.
///
/// `flags` holds the values taken from the command line; an empty module
/// means "not given". When `prompter` is present every field is asked for,
/// with the value resolved so far offered as the default.
pub fn resolve_config(
    flags: GenerationConfig,
    answers: Answers,
    prompter: Option<&dyn Prompter>,
) -> Result<GenerationConfig> {
    let mut config = GenerationConfig {
        root: answers.root.unwrap_or(flags.root),
        module: answers.module.unwrap_or(flags.module),
        port: answers.port.unwrap_or(flags.port),
        gitkeep: answers.gitkeep.unwrap_or(flags.gitkeep),
        clean: answers.clean.unwrap_or(flags.clean),
    };

    if let Some(prompter) = prompter {
        let root = prompter.text("Project directory", &config.root.to_string_lossy())?;
        if !root.trim().is_empty() {
            config.root = PathBuf::from(root.trim());
        }

        let module = prompter.text("Go module name (github.com/user/project)", &config.module)?;
        if !module.trim().is_empty() {
            config.module = module.trim().to_string();
        }

        let port = prompter.text("Server port", &config.port)?;
        if !port.trim().is_empty() {
            config.port = port.trim().to_string();
        }

        config.gitkeep = prompter.confirm("Add .gitkeep files?", config.gitkeep)?;
        config.clean = prompter.confirm("Clean target directory first?", config.clean)?;
    }

    if config.module.trim().is_empty() {
        config.module = DEFAULT_MODULE.to_string();
    }

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}
