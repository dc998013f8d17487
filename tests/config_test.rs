use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use hexagen::config::{parse_answers, resolve_config, Answers, GenerationConfig, DEFAULT_MODULE};
use hexagen::error::Result;
use hexagen::prompt::Prompter;

/// Replays canned replies; an empty reply stands for pressing enter.
struct ScriptedPrompter {
    replies: RefCell<VecDeque<&'static str>>,
    asked: RefCell<Vec<(String, String)>>,
}

impl ScriptedPrompter {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    fn next(&self) -> &'static str {
        self.replies.borrow_mut().pop_front().unwrap_or("")
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&self, prompt: &str, default: &str) -> Result<String> {
        self.asked
            .borrow_mut()
            .push((prompt.to_string(), default.to_string()));
        let reply = self.next();
        Ok(if reply.is_empty() { default.to_string() } else { reply.to_string() })
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.asked
            .borrow_mut()
            .push((prompt.to_string(), default.to_string()));
        Ok(match self.next() {
            "" => default,
            reply => reply.eq_ignore_ascii_case("y"),
        })
    }
}

fn flags() -> GenerationConfig {
    GenerationConfig {
        root: PathBuf::from("out"),
        module: String::new(),
        port: "8080".to_string(),
        gitkeep: false,
        clean: false,
    }
}

#[test]
fn test_flags_only_apply_default_module() {
    let config = resolve_config(flags(), Answers::default(), None).unwrap();

    assert_eq!(config.root, PathBuf::from("out"));
    assert_eq!(config.module, DEFAULT_MODULE);
    assert_eq!(config.port, "8080");
}

#[test]
fn test_explicit_module_is_kept() {
    let mut flags = flags();
    flags.module = "github.com/acme/widget".to_string();
    let config = resolve_config(flags, Answers::default(), None).unwrap();

    assert_eq!(config.module, "github.com/acme/widget");
}

#[test]
fn test_answers_override_flags() {
    let answers = parse_answers(r#"{"port": "9090", "gitkeep": true}"#).unwrap();
    let config = resolve_config(flags(), answers, None).unwrap();

    assert_eq!(config.port, "9090");
    assert!(config.gitkeep);
    assert!(!config.clean);
    assert_eq!(config.root, PathBuf::from("out"));
}

#[test]
fn test_prompts_override_everything() {
    let prompter = ScriptedPrompter::new(&["svc", "github.com/acme/widget", "9090", "y", "Y"]);
    let answers = parse_answers(r#"{"port": "7000"}"#).unwrap();
    let config = resolve_config(flags(), answers, Some(&prompter as &dyn Prompter)).unwrap();

    assert_eq!(
        config,
        GenerationConfig {
            root: PathBuf::from("svc"),
            module: "github.com/acme/widget".to_string(),
            port: "9090".to_string(),
            gitkeep: true,
            clean: true,
        }
    );
}

#[test]
fn test_prompts_offer_resolved_values_as_defaults() {
    let prompter = ScriptedPrompter::new(&[]);
    let answers = parse_answers(r#"{"port": "7000", "clean": true}"#).unwrap();
    let config = resolve_config(flags(), answers, Some(&prompter as &dyn Prompter)).unwrap();

    let asked = prompter.asked.borrow();
    assert_eq!(asked.len(), 5);
    assert_eq!(asked[0].1, "out");
    assert_eq!(asked[1].1, "");
    assert_eq!(asked[2].1, "7000");
    assert_eq!(asked[4].1, "true");

    assert_eq!(config.port, "7000");
    assert!(config.clean);
    assert_eq!(config.module, DEFAULT_MODULE);
}

#[test]
fn test_blank_prompt_replies_keep_previous_values() {
    let prompter = ScriptedPrompter::new(&["   ", "  ", " ", "n", "n"]);
    let config = resolve_config(flags(), Answers::default(), Some(&prompter as &dyn Prompter)).unwrap();

    assert_eq!(config.root, PathBuf::from("out"));
    assert_eq!(config.module, DEFAULT_MODULE);
    assert_eq!(config.port, "8080");
    assert!(!config.gitkeep);
    assert!(!config.clean);
}
