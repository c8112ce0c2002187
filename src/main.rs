mod cmd;
mod collector;
mod decoder;
mod highlight;
mod host;
mod html;
mod ini;
mod renderer;
mod selection;
mod settings;
mod terminal;
#[cfg(test)]
mod testing;
mod transport;
mod workflow;

use cmd::CommandLineArgs;
use ini::{IniProfileStore, DEFAULT_INI_FILE_PATH};
use selection::{Document, Editor};
use settings::Settings;
use terminal::TerminalHost;
use transport::{HttpTransport, TransportError};
use workflow::Outcome;

use anyhow::Result;
use std::io::{stderr, stdin};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const LOG_ENV: &str = "GQLVIEW_LOG";

fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(stderr)
        .try_init();
}

fn open_editor(args: &CommandLineArgs) -> Result<Option<Editor>> {
    let Some(path) = args.document() else {
        return Ok(None);
    };
    let document = Document::open(path)?;
    let selection = args.selection().unwrap_or_else(|| document.full_range());
    Ok(Some(Editor::new(document, vec![selection])))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cmd_args = CommandLineArgs::parse()?;
    setup_tracing(cmd_args.verbose());

    let ini_profile = IniProfileStore::load_profile(DEFAULT_INI_FILE_PATH, cmd_args.profile())?;
    let settings = Settings::merge(&cmd_args, ini_profile.as_ref());
    debug!(
        endpoint = ?settings.endpoint(),
        omitted_variables = ?settings.omitted_variables(),
        "settings resolved"
    );

    let editor = open_editor(&cmd_args)?;
    let transport = HttpTransport::new(&settings)?;
    let mut host = TerminalHost::new(
        stdin().lock(),
        stderr(),
        cmd_args.output(),
        atty::is(atty::Stream::Stdin),
    );

    let outcome = workflow::run(
        &mut host,
        &transport,
        editor.as_ref(),
        settings.endpoint().map(|e| e.as_str()),
        settings.omitted_variables(),
    )
    .await?;

    match outcome {
        Outcome::Rendered => {
            eprintln!("Response written to {}", cmd_args.output().display());
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Aborted(step) => {
            eprintln!("Cancelled at the {step} prompt.");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failed(e) => {
            eprintln!("Error: {e:#}");
            if let Some(TransportError::GraphQL { response, .. }) =
                e.downcast_ref::<TransportError>()
            {
                if !response.is_null() {
                    eprintln!("{}", html::to_json_string(response, 2)?);
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
