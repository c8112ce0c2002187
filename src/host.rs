//! The surface the workflow drives: prompts, notifications and panels.
//!
//! Everything the workflow needs from its environment goes through [`Host`],
//! so the same collector and renderer run against the terminal binary and
//! against the in-memory host used by the tests.

use anyhow::Result;

/// Returns `None` to accept the candidate, or the message to show.
pub type Validator = fn(&str) -> Option<String>;

#[derive(Clone, Default)]
pub struct InputBoxOptions<'a> {
    pub placeholder: &'a str,
    pub value: Option<&'a str>,
    pub validate: Option<Validator>,
}

impl InputBoxOptions<'_> {
    pub fn check(&self, candidate: &str) -> Option<String> {
        self.validate.and_then(|v| v(candidate))
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewColumn {
    One,
    Two,
    Three,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOptions<'a> {
    pub view_type: &'a str,
    pub title: &'a str,
    pub column: ViewColumn,
}

pub trait Panel {
    fn set_html(&mut self, html: String) -> Result<()>;
}

pub trait Host {
    type Panel: Panel;

    /// Shows a prompt and blocks until the user answers. Candidates rejected
    /// by `options.validate` are never returned; `Ok(None)` means cancelled.
    fn show_input_box(&mut self, options: &InputBoxOptions<'_>) -> Result<Option<String>>;

    fn show_information_message(&mut self, message: &str);

    fn create_panel(&mut self, options: &PanelOptions<'_>) -> Result<Self::Panel>;
}
