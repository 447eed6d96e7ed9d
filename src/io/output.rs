use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::DocumentFormat;

/// Where a submitted result is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` means stdout, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            OutputDestination::Stdout
        } else {
            OutputDestination::file(raw)
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub overwrite: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            overwrite: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.destinations.iter().filter_map(|destination| match destination {
            OutputDestination::File(path) => Some(path.as_path()),
            OutputDestination::Stdout => None,
        })
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serialize `value` once and write it to every destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    if !options.overwrite
        && let Some(existing) = options.file_paths().find(|path| path.exists())
    {
        bail!("file {} already exists", existing.display());
    }
    let rendered = render(value, options)?;
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{rendered}").context("failed to write to stdout")?;
                stdout.flush().context("failed to flush stdout")?;
            }
            OutputDestination::File(path) => write_file(path, &rendered)
                .with_context(|| format!("failed to write to file {}", path.display()))?,
        }
    }
    Ok(())
}

fn render(value: &Value, options: &OutputOptions) -> Result<String> {
    match options.format {
        DocumentFormat::Json if options.pretty => {
            serde_json::to_string_pretty(value).context("failed to serialize JSON")
        }
        DocumentFormat::Json => serde_json::to_string(value).context("failed to serialize JSON"),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if options.pretty => {
            toml::to_string_pretty(value).context("failed to serialize TOML")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value).context("failed to serialize TOML"),
    }
}

fn write_file(path: &Path, rendered: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    writeln!(file, "{rendered}")?;
    file.flush()
}
