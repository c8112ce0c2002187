//! Line-numbered syntax highlighting on top of syntect. Scopes become
//! `hljs-` prefixed classes so the stylesheet in [`crate::html`] can colour
//! the output per theme.

use anyhow::{Context, Result};
use std::sync::OnceLock;
use syntect::html::{line_tokens_to_classed_spans, ClassStyle};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};

pub const CLASS_PREFIX: &str = "hljs-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Json,
}

impl Language {
    fn extension(&self) -> &'static str {
        match self {
            Language::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    pub language: Language,
    pub start: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightOptions {
            language: Language::Json,
            start: 1,
        }
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn find_syntax(syntax_set: &SyntaxSet, language: Language) -> &SyntaxReference {
    syntax_set
        .find_syntax_by_extension(language.extension())
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

fn open_span(scope: Scope) -> String {
    let classes = scope
        .build_string()
        .split('.')
        .map(|atom| format!("{CLASS_PREFIX}{atom}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("<span class=\"{classes}\">")
}

/// Highlights `text` and wraps every line in
/// `<span class="line" start="N">`, numbering from `options.start`.
///
/// Scopes still open at the end of a line are closed there and reopened on
/// the next one, so every line element is self-contained.
pub fn highlight(text: &str, options: &HighlightOptions) -> Result<String> {
    let syntax_set = syntax_set();
    let syntax = find_syntax(syntax_set, options.language);
    let mut parse_state = ParseState::new(syntax);
    let mut scope_stack = ScopeStack::new();

    let mut lines = Vec::new();
    for (n, line) in text.split('\n').enumerate() {
        let reopened: String = scope_stack.as_slice().iter().copied().map(open_span).collect();

        // the default syntaxes expect each line to carry its newline
        let line = format!("{line}\n");
        let ops = parse_state
            .parse_line(&line, syntax_set)
            .with_context(|| format!("Failed to parse line {}", options.start + n))?;
        let (body, _) = line_tokens_to_classed_spans(&line, &ops, CLASS_STYLE, &mut scope_stack)
            .with_context(|| format!("Failed to highlight line {}", options.start + n))?;

        lines.push(format!(
            "<span class=\"line\" start=\"{}\">{}{}{}</span>",
            options.start + n,
            reopened,
            body.replace('\n', ""),
            "</span>".repeat(scope_stack.len())
        ));
    }

    Ok(lines.join("\n"))
}
