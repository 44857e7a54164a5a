//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for a terminal run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Streamed text followed by the logic section
    #[default]
    Text,
    /// One JSON document once every round has finished
    Json,
}

/// CLI arguments for question-chain
#[derive(Parser, Debug)]
#[command(name = "question-chain")]
#[command(author, version, about = "Generate linked question chains for teaching, with a streaming LLM")]
#[command(long_about = r#"
question-chain asks a language model for a chain of progressively harder,
linked questions about one topic of a subject, and optionally for answers.

Each run has up to two rounds:
1. Questions: the chain itself, ending with a "关联逻辑说明" (logic) section
2. Answers: the full question text is fed back and answered

The API key is read from $OPENROUTER_API_KEY (or provider.api_key_env).

Configuration files are loaded from (in priority order):
1. QCHAIN_<SECTION>__<KEY>                 Environment overrides
2. --config <path>                         Explicit config file
3. ./question-chain.toml                   Project-level config
4. ~/.config/question-chain/config.toml    Global config

Example:
  question-chain serve --bind 127.0.0.1:8501
  question-chain generate --subject 初中物理 --topic 凸透镜成像规律 --answers
  question-chain config
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web UI
    Serve {
        /// Socket address to listen on (overrides server.bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Run the rounds once in the terminal
    Generate {
        /// Subject, e.g. "初中物理"
        #[arg(short, long)]
        subject: String,

        /// Core topic within the subject, e.g. "凸透镜成像规律"
        #[arg(short, long)]
        topic: String,

        /// Also run the answers round
        #[arg(short, long)]
        answers: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Suppress progress indicators and live text
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show configuration sources and the effective configuration
    Config,
}
