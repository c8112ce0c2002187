use crate::host::{Host, InputBoxOptions};
use crate::selection::{selected_text, Editor};

use anyhow::Result;
use std::fmt::{Display, Formatter};
use tracing::debug;

const PLACEHOLDER_ENDPOINT: &str = "Select your API End-point";
const PLACEHOLDER_QUERY: &str = "Select your Query";
const PLACEHOLDER_VARIABLES: &str = "Select your Variable";

const MSG_ENDPOINT: &str = "Type your API End-Point with 'http'";
const MSG_QUERY: &str = "Type your query with 'query'";

pub fn validate_endpoint(text: &str) -> Option<String> {
    if text.contains("http") {
        None
    } else {
        Some(MSG_ENDPOINT.to_string())
    }
}

pub fn validate_query(text: &str) -> Option<String> {
    if text.contains("query") {
        None
    } else {
        Some(MSG_QUERY.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput {
    pub endpoint: String,
    pub query: String,
    pub variables: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Endpoint,
    Query,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Endpoint => "endpoint",
            Step::Query => "query",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    Ready(QueryInput),
    Aborted(Step),
}

enum State {
    Endpoint,
    Query { endpoint: String },
    Variables { endpoint: String, query: String },
}

/// Walks endpoint -> query -> variables. The query prompt is pre-filled with
/// the primary selection of `editor`; `endpoint` pre-fills the first prompt.
/// Only the endpoint and query prompts can abort; a cancelled variables
/// prompt means no variables.
pub fn collect<H: Host>(
    host: &mut H,
    editor: Option<&Editor>,
    endpoint: Option<&str>,
) -> Result<Collected> {
    let mut state = State::Endpoint;

    loop {
        state = match state {
            State::Endpoint => {
                let answer = host.show_input_box(&InputBoxOptions {
                    placeholder: PLACEHOLDER_ENDPOINT,
                    value: endpoint,
                    validate: Some(validate_endpoint),
                })?;
                match answer {
                    Some(endpoint) => State::Query { endpoint },
                    None => return Ok(Collected::Aborted(Step::Endpoint)),
                }
            }
            State::Query { endpoint } => {
                let selection = selected_text(editor);
                debug!(selection_len = selection.len(), "pre-filling query prompt");
                let answer = host.show_input_box(&InputBoxOptions {
                    placeholder: PLACEHOLDER_QUERY,
                    value: Some(selection.as_str()),
                    validate: Some(validate_query),
                })?;
                match answer {
                    Some(query) => State::Variables { endpoint, query },
                    None => return Ok(Collected::Aborted(Step::Query)),
                }
            }
            State::Variables { endpoint, query } => {
                let answer = host.show_input_box(&InputBoxOptions {
                    placeholder: PLACEHOLDER_VARIABLES,
                    value: None,
                    validate: None,
                })?;
                let variables = answer.filter(|v| !v.trim().is_empty());

                match &variables {
                    Some(v) => host.show_information_message(&format!("Variables: {v}")),
                    None => host.show_information_message("No variables supplied"),
                }

                return Ok(Collected::Ready(QueryInput {
                    endpoint,
                    query,
                    variables,
                }));
            }
        };
    }
}
