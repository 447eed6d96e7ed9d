//! `dashform` edits one CMS entity through a bilingual terminal form and
//! submits it to a REST backend, or echoes the payload when none is given.

use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use dashform::{
    EntityStore, FormDefinition, FormUI, FormValues, Language, RestClient, SubmissionController,
    SubmitMode, SubmitOutcome, Translator, UiOutcome,
    domain::parse_form_definition,
    io::{DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_any},
    submit::{Payload, StoreError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Create,
    Update,
}

#[derive(Debug, Parser)]
#[command(
    name = "dashform",
    version,
    about = "Edit CMS entities through bilingual terminal forms"
)]
struct Cli {
    /// Form definition spec: file path, inline payload, or "-" for stdin
    #[arg(long = "form", value_name = "SPEC")]
    form: String,

    /// Current entity data: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "data", value_name = "SPEC")]
    data: Option<String>,

    /// Create a new entity or update an existing one
    #[arg(long = "mode", value_enum, default_value_t = ModeArg::Create)]
    mode: ModeArg,

    /// Entity id, required with --mode update
    #[arg(long = "id", value_name = "ID")]
    id: Option<String>,

    /// Parent entity id sent with create requests
    #[arg(long = "parent", value_name = "ID")]
    parent: Option<String>,

    /// Session language: en or ar
    #[arg(
        long = "lang",
        env = "DASHFORM_LANG",
        default_value = "en",
        value_parser = parse_language
    )]
    lang: Language,

    /// Base URL of the REST backend; without it submissions are echoed
    #[arg(long = "api", env = "DASHFORM_API", value_name = "URL")]
    api: Option<String>,

    /// Delete the entity with this id instead of opening the form
    #[arg(long = "delete", value_name = "ID", conflicts_with_all = ["data", "id", "parent"])]
    delete: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Write logs to this file; filter with DASHFORM_LOG
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

fn parse_language(raw: &str) -> std::result::Result<Language, String> {
    Language::parse(raw).ok_or_else(|| format!("unsupported language '{raw}' (expected en or ar)"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut diagnostics = DiagnosticCollector::default();

    let both_stdin = cli.form == "-" && cli.data.as_deref() == Some("-");
    if both_stdin {
        diagnostics.push_input(
            "form/data",
            "cannot read form and data from stdin simultaneously; provide inline content or files",
        );
    }

    let definition = load_optional_value(Some(&cli.form), "form", both_stdin, &mut diagnostics)
        .and_then(|value| match parse_form_definition(&value) {
            Ok(definition) => Some(definition),
            Err(err) => {
                diagnostics.push_input("form", format!("{err:#}"));
                None
            }
        });
    let data = load_optional_value(cli.data.as_deref(), "data", both_stdin, &mut diagnostics);
    if data.as_ref().is_some_and(|value| !value.is_object()) {
        diagnostics.push_input("data", "entity data must be an object");
    }

    let mode = match (cli.mode, cli.id.clone()) {
        (ModeArg::Create, _) => Some(SubmitMode::Create {
            parent_id: cli.parent.clone(),
        }),
        (ModeArg::Update, Some(entity_id)) => Some(SubmitMode::Update { entity_id }),
        (ModeArg::Update, None) => {
            diagnostics.push_input("mode", "--mode update requires --id");
            None
        }
    };

    let output = build_output_options(&cli, &mut diagnostics);
    diagnostics.into_result()?;

    let (Some(definition), Some(mode), Some(output)) = (definition, mode, output) else {
        return Err(eyre!("invalid arguments"));
    };

    let (store, remote) = build_store(cli.api.as_deref(), &definition)?;

    if let Some(entity_id) = cli.delete.as_deref() {
        return run_delete(store, cli.lang, entity_id, &output);
    }

    let seed = data.map(|value| FormValues::from_json(&definition.fields, &value));
    let mut ui = FormUI::new(definition)
        .with_mode(mode)
        .with_language(cli.lang)
        .with_store(store);
    if let Some(source) = remote {
        ui = ui.with_option_source(source);
    }
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }
    if let Some(values) = seed {
        ui = ui.with_seed(values);
    }

    match ui.run().map_err(Report::msg)? {
        UiOutcome::Saved {
            values, response, ..
        } => {
            let document = response.unwrap_or_else(|| values.to_json());
            emit(&document, &output).map_err(Report::msg)?;
        }
        UiOutcome::Cancelled => {
            tracing::info!("form closed without saving");
            eprintln!("closed without saving");
        }
    }

    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("DASHFORM_LOG")
        .unwrap_or_else(|_| EnvFilter::new("dashform=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("failed to install logger: {err}"))
}

type StorePair = (Arc<dyn EntityStore>, Option<Arc<RestClient>>);

fn build_store(api: Option<&str>, definition: &FormDefinition) -> Result<StorePair> {
    match api {
        Some(base) => {
            let client = RestClient::new(base, definition.entity.clone())
                .wrap_err_with(|| format!("invalid --api base URL '{base}'"))?;
            let client = Arc::new(client);
            tracing::info!(base, entity = %definition.entity, "using REST backend");
            let store: Arc<dyn EntityStore> = client.clone();
            Ok((store, Some(client)))
        }
        None => {
            let store: Arc<dyn EntityStore> = Arc::new(EchoStore);
            Ok((store, None))
        }
    }
}

fn run_delete(
    store: Arc<dyn EntityStore>,
    language: Language,
    entity_id: &str,
    output: &OutputOptions,
) -> Result<()> {
    let controller = SubmissionController::new(
        store,
        SubmitMode::Update {
            entity_id: entity_id.to_string(),
        },
        Translator::new(language),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;
    match runtime.block_on(controller.delete(entity_id)) {
        SubmitOutcome::Saved {
            response,
            notification,
            ..
        } => {
            eprintln!("{}", notification.text);
            emit(&response, output).map_err(Report::msg)
        }
        other => Err(eyre!(
            other
                .notification()
                .map(|notification| notification.text.clone())
                .unwrap_or_else(|| format!("failed to delete {entity_id}"))
        )),
    }
}

/// Store used without `--api`: confirms every call by echoing what would
/// have been sent.
struct EchoStore;

#[async_trait]
impl EntityStore for EchoStore {
    async fn create(
        &self,
        payload: Payload,
        language: Language,
        parent_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        tracing::debug!(%language, ?parent_id, "echoing create");
        Ok(payload.preview())
    }

    async fn update(
        &self,
        payload: Payload,
        entity_id: &str,
        language: Language,
    ) -> Result<Value, StoreError> {
        tracing::debug!(%language, entity_id, "echoing update");
        Ok(payload.preview())
    }

    async fn delete(&self, entity_id: &str, language: Language) -> Result<Value, StoreError> {
        tracing::debug!(%language, entity_id, "echoing delete");
        Ok(json!({ "id": entity_id, "deleted": true }))
    }
}

fn load_optional_value(
    spec: Option<&str>,
    label: &str,
    skip: bool,
    diagnostics: &mut DiagnosticCollector,
) -> Option<Value> {
    if skip {
        return None;
    }
    match load_value(spec?, label) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_input(label, format!("{err:#}"));
            None
        }
    }
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_contents(&buffer, DocumentFormat::default(), label);
    }

    let trimmed = spec.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_contents(spec, DocumentFormat::Json, &format!("inline {label}"));
    }

    let path = Path::new(spec);
    match fs::read_to_string(path) {
        Ok(contents) => {
            let format = DocumentFormat::from_path(path).unwrap_or_default();
            parse_contents(&contents, format, label)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            parse_contents(spec, DocumentFormat::default(), &format!("inline {label}"))
        }
        Err(err) => Err(err).wrap_err_with(|| format!("failed to read {label} from {}", path.display())),
    }
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    parse_document_any(contents, format).map_err(|err| eyre!("failed to parse {label}: {err:#}"))
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    cli: &Cli,
    diagnostics: &mut DiagnosticCollector,
) -> Option<OutputOptions> {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        destinations.push(OutputDestination::parse(raw));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let mut format: Option<DocumentFormat> = None;
    let mut healthy = true;
    for destination in &destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        match DocumentFormat::from_path(path) {
            Some(found) => match format {
                Some(existing) if existing != found => {
                    healthy = false;
                    diagnostics.push_output(format!(
                        "output file {} uses {found} but other destinations use {existing}; align extensions",
                        path.display()
                    ));
                }
                Some(_) => {}
                None => format = Some(found),
            },
            None => {
                healthy = false;
                diagnostics.push_output(format!(
                    "cannot infer format from output file {}; use one of: {}",
                    path.display(),
                    format_list()
                ));
            }
        }
        if !cli.force && path.exists() {
            healthy = false;
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }

    healthy.then(|| {
        OutputOptions::new(format.unwrap_or_default())
            .with_pretty(!cli.no_pretty)
            .with_overwrite(cli.force)
            .with_destinations(destinations)
    })
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format!(".{format}"))
        .collect::<Vec<_>>()
        .join(", ")
}
