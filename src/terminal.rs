use crate::host::{Host, InputBoxOptions, Panel, PanelOptions};

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Host backed by a line-oriented terminal: prompts and messages go to
/// `output`, answers come from `input`. End of input cancels the prompt.
pub struct TerminalHost<R: BufRead, W: Write> {
    input: R,
    output: W,
    panel_path: PathBuf,
    interactive: bool,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W, panel_path: impl Into<PathBuf>, interactive: bool) -> Self {
        TerminalHost {
            input,
            output,
            panel_path: panel_path.into(),
            interactive,
        }
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        while buffer.ends_with('\n') || buffer.ends_with('\r') {
            buffer.pop();
        }
        Ok(Some(buffer))
    }
}

impl<R: BufRead, W: Write> Host for TerminalHost<R, W> {
    type Panel = FilePanel;

    fn show_input_box(&mut self, options: &InputBoxOptions<'_>) -> Result<Option<String>> {
        let prefill = options.value.filter(|v| !v.is_empty());

        if let Some(value) = prefill {
            if value.contains('\n') || self.interactive {
                writeln!(self.output, "{value}")?;
                if self.interactive {
                    writeln!(self.output, "(press Enter to keep the text above)")?;
                }
            }
        }

        loop {
            match prefill {
                Some(value) if !value.contains('\n') => {
                    write!(self.output, "{} [{}]: ", options.placeholder, value)?
                }
                _ => write!(self.output, "{}: ", options.placeholder)?,
            }
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            let answer = match prefill {
                Some(value) if answer.is_empty() => value.to_string(),
                _ => answer,
            };

            match options.check(&answer) {
                Some(message) => {
                    debug!(placeholder = options.placeholder, "rejected input");
                    writeln!(self.output, "{message}")?;
                }
                None => return Ok(Some(answer)),
            }
        }
    }

    fn show_information_message(&mut self, message: &str) {
        info!("{message}");
        let _ = writeln!(self.output, "{message}");
    }

    fn create_panel(&mut self, options: &PanelOptions<'_>) -> Result<FilePanel> {
        debug!(
            view_type = options.view_type,
            column = ?options.column,
            path = %self.panel_path.display(),
            "opening panel"
        );
        Ok(FilePanel::new(&self.panel_path, options.title))
    }
}

/// Panel rendered to an HTML file. Nothing is written until content is set,
/// so a failed request leaves whatever was there before.
#[derive(Debug)]
pub struct FilePanel {
    path: PathBuf,
    title: String,
}

impl FilePanel {
    pub fn new(path: &Path, title: &str) -> Self {
        FilePanel {
            path: path.to_path_buf(),
            title: title.to_string(),
        }
    }
}

impl Panel for FilePanel {
    fn set_html(&mut self, html: String) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        std::fs::write(&self.path, html)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!(title = %self.title, path = %self.path.display(), "panel updated");
        Ok(())
    }
}
