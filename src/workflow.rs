use crate::collector::{collect, Collected, Step};
use crate::host::Host;
use crate::renderer::{render_response, OmittedVariables, RenderOutcome};
use crate::selection::Editor;
use crate::transport::Transport;

use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub enum Outcome {
    Aborted(Step),
    Rendered,
    Failed(anyhow::Error),
}

/// Collects the three inputs, then performs the single request and render.
pub async fn run<H, T>(
    host: &mut H,
    transport: &T,
    editor: Option<&Editor>,
    endpoint: Option<&str>,
    omitted: OmittedVariables,
) -> Result<Outcome>
where
    H: Host,
    T: Transport + ?Sized,
{
    let input = match collect(host, editor, endpoint)? {
        Collected::Ready(input) => input,
        Collected::Aborted(step) => {
            info!(%step, "input cancelled");
            return Ok(Outcome::Aborted(step));
        }
    };

    Ok(match render_response(host, transport, &input, omitted).await? {
        RenderOutcome::Rendered => Outcome::Rendered,
        RenderOutcome::Failed(e) => Outcome::Failed(e),
    })
}
