use crate::host::{Host, InputBoxOptions, Panel, PanelOptions, ViewColumn};
use crate::transport::{Transport, TransportError};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub placeholder: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPanel {
    pub view_type: String,
    pub title: String,
    pub column: ViewColumn,
    pub html: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StubPanel {
    state: Rc<RefCell<RecordedPanel>>,
}

impl Panel for StubPanel {
    fn set_html(&mut self, html: String) -> Result<()> {
        self.state.borrow_mut().html = Some(html);
        Ok(())
    }
}

/// Scripted host: each prompt consumes answers until one passes validation.
/// Running out of answers behaves like cancelling.
#[derive(Debug, Default)]
pub struct StubHost {
    answers: VecDeque<Option<String>>,
    pub prompts: Vec<RecordedPrompt>,
    pub rejections: Vec<String>,
    pub messages: Vec<String>,
    panels: Vec<Rc<RefCell<RecordedPanel>>>,
}

impl StubHost {
    pub fn answering(answers: Vec<Option<&str>>) -> Self {
        StubHost {
            answers: answers
                .into_iter()
                .map(|a| a.map(|s| s.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn panels(&self) -> Vec<RecordedPanel> {
        self.panels.iter().map(|p| p.borrow().clone()).collect()
    }
}

impl Host for StubHost {
    type Panel = StubPanel;

    fn show_input_box(&mut self, options: &InputBoxOptions<'_>) -> Result<Option<String>> {
        self.prompts.push(RecordedPrompt {
            placeholder: options.placeholder.to_string(),
            value: options.value.map(|v| v.to_string()),
        });

        while let Some(answer) = self.answers.pop_front() {
            let Some(text) = answer else {
                return Ok(None);
            };
            match options.check(&text) {
                Some(message) => self.rejections.push(message),
                None => return Ok(Some(text)),
            }
        }
        Ok(None)
    }

    fn show_information_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn create_panel(&mut self, options: &PanelOptions<'_>) -> Result<StubPanel> {
        let state = Rc::new(RefCell::new(RecordedPanel {
            view_type: options.view_type.to_string(),
            title: options.title.to_string(),
            column: options.column,
            html: None,
        }));
        self.panels.push(state.clone());
        Ok(StubPanel { state })
    }
}

/// Transport double that records the variables argument of every call.
#[derive(Debug)]
pub struct StubTransport {
    outcome: Option<Value>,
    calls: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl StubTransport {
    pub fn replying(response: Value) -> Self {
        StubTransport {
            outcome: Some(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        StubTransport {
            outcome: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, Option<Value>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn request(
        &self,
        endpoint: &str,
        query: &str,
        variables: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((endpoint.to_string(), query.to_string(), variables.cloned()));
        }
        match &self.outcome {
            Some(response) => Ok(response.clone()),
            None => Err(TransportError::GraphQL {
                status: 503,
                message: "Service Unavailable".to_string(),
                response: Value::Null,
            }),
        }
    }
}
