//! CLI entrypoint for question-chain
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use qchain_application::{
    GenerateAnswersUseCase, GenerateQuestionsUseCase, GenerationParams, LlmGateway, NoProgress,
    StreamNotifier,
};
use qchain_domain::{ChainRequest, SessionResult};
use qchain_infrastructure::{ConfigLoader, FileConfig, OpenRouterGateway, resolve_api_key};
use qchain_presentation::{
    AppState, ChainReport, Cli, Command, ConsoleFormatter, OutputFormat, SimpleProgress,
    TerminalReporter, router, spawn_idle_sweeper,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.directory.as_deref())?;
    info!("Starting question-chain");

    if let Command::Config = cli.command {
        return show_config(&cli, &config);
    }

    config.validate().context("invalid configuration")?;
    if resolve_api_key(&config.provider).is_none() {
        warn!(
            "No API key configured; set {} before generating",
            config.provider.api_key_env
        );
    }

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(OpenRouterGateway::from_config(&config)?);
    let params = config.generation_params();

    match cli.command {
        Command::Serve { bind } => serve(&config, gateway, params, bind).await,
        Command::Generate {
            subject,
            topic,
            answers,
            output,
            quiet,
        } => {
            let request = ChainRequest::try_new(subject, topic)?;
            generate(gateway, params, request, answers, output, quiet).await
        }
        Command::Config => Ok(()),
    }
}

/// Initialize logging based on verbosity level, plus an optional daily log file
fn init_logging(verbose: u8, directory: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // Stdout carries the streamed reply, so console logs go to stderr.
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("question-chain")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("cannot open log directory {dir}"))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    if cli.no_config {
        println!("Configuration files disabled (--no-config); showing built-in defaults.");
    } else {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{line}");
        }
    }
    println!();

    match resolve_api_key(&config.provider) {
        Some(key) => println!("API key: found ({})", key.source.description()),
        None => println!(
            "API key: not set (export {})",
            config.provider.api_key_env
        ),
    }
    if let Err(e) = config.validate() {
        println!("Validation: {e}");
    }
    println!();

    let rendered =
        toml::to_string_pretty(&config.redacted()).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

async fn serve(
    config: &FileConfig,
    gateway: Arc<dyn LlmGateway>,
    params: GenerationParams,
    bind: Option<String>,
) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::new(gateway, params);
    let _sweeper = spawn_idle_sweeper(state.sessions.clone(), config.session_idle_timeout());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!(address = %local, model = %state.model, "Web UI listening");
    println!("Serving question-chain on http://{local}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("web server failed")?;

    Ok(())
}

async fn generate(
    gateway: Arc<dyn LlmGateway>,
    params: GenerationParams,
    request: ChainRequest,
    with_answers: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let live = output == OutputFormat::Text && !quiet;
    let notifier: Box<dyn StreamNotifier> = if live {
        Box::new(TerminalReporter::new())
    } else if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(SimpleProgress)
    };

    let model = params.model.to_string();
    let mut session = SessionResult::new();

    let questions = GenerateQuestionsUseCase::new(gateway.clone(), params.clone())
        .execute(&request, &mut session, notifier.as_ref())
        .await?;

    if output == OutputFormat::Text {
        if live {
            print!("{}", ConsoleFormatter::format_logic_section(&questions.sections));
        } else {
            print!("{}", ConsoleFormatter::format_questions(&questions.sections));
        }
    }

    let answers = if with_answers {
        let answers = GenerateAnswersUseCase::new(gateway, params)
            .execute(&mut session, notifier.as_ref())
            .await?;
        if output == OutputFormat::Text && !live {
            print!("{}", ConsoleFormatter::format_answers(&answers.text));
        }
        Some(answers.text)
    } else {
        None
    };

    if output == OutputFormat::Json {
        let report = ChainReport {
            subject: request.subject().to_string(),
            topic: request.topic().to_string(),
            model,
            questions: questions.text,
            questions_body: questions.sections.body,
            logic_section: questions.sections.logic_section,
            answers,
        };
        println!("{}", ConsoleFormatter::format_json(&report));
    }

    Ok(())
}
