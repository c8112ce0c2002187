use crate::collector::QueryInput;
use crate::host::{Host, Panel, PanelOptions, ViewColumn};
use crate::html::{to_json_string, webview_content};
use crate::transport::Transport;

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, error, info};

pub const PANEL_VIEW_TYPE: &str = "graphqlResponse";
pub const PANEL_TITLE: &str = "Graphql Response";

/// What to send when the user leaves the variables prompt empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OmittedVariables {
    /// Send the query alone, without a variables member.
    #[default]
    Absent,
    /// Send `"variables": {}`.
    EmptyObject,
}

impl FromStr for OmittedVariables {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absent" | "none" => Ok(OmittedVariables::Absent),
            "empty-object" | "empty_object" | "{}" => Ok(OmittedVariables::EmptyObject),
            other => Err(anyhow!("unknown omitted-variables mode: {other}")),
        }
    }
}

pub fn resolve_variables(raw: Option<&str>, omitted: OmittedVariables) -> Result<Option<Value>> {
    let Some(text) = raw.filter(|t| !t.trim().is_empty()) else {
        return Ok(match omitted {
            OmittedVariables::Absent => None,
            OmittedVariables::EmptyObject => Some(Value::Object(Map::new())),
        });
    };

    let value: Value =
        serde_json::from_str(text).context("Variables must be a JSON object")?;
    if !value.is_object() {
        bail!("Variables must be a JSON object, got: {}", text.trim());
    }
    Ok(Some(value))
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered,
    /// The panel was left untouched.
    Failed(anyhow::Error),
}

/// Opens the response panel, performs the one request and fills the panel
/// with the highlighted response. Request failures come back as
/// [`RenderOutcome::Failed`]; only host errors are returned as `Err`.
pub async fn render_response<H, T>(
    host: &mut H,
    transport: &T,
    input: &QueryInput,
    omitted: OmittedVariables,
) -> Result<RenderOutcome>
where
    H: Host,
    T: Transport + ?Sized,
{
    let mut panel = host.create_panel(&PanelOptions {
        view_type: PANEL_VIEW_TYPE,
        title: PANEL_TITLE,
        column: ViewColumn::Two,
    })?;

    let response = match resolve_variables(input.variables.as_deref(), omitted) {
        Ok(variables) => transport
            .request(&input.endpoint, &input.query, variables.as_ref())
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            error!(endpoint = %input.endpoint, error = %e, "GraphQL request failed");
            return Ok(RenderOutcome::Failed(e));
        }
    };

    debug!("{}", to_json_string(&response, 4)?);
    panel.set_html(webview_content(&response)?)?;
    info!(endpoint = %input.endpoint, "response rendered");

    Ok(RenderOutcome::Rendered)
}
