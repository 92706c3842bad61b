use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use funcminer::backend::{
    get_handler_factory, HandlerFactory, Language, LanguageHandler, ParserFamily,
};
use funcminer::config::{load_config, save_config, PipelineConfig};
use funcminer::errors::MinerError;
use funcminer::pipeline::Pipeline;
use funcminer::types::FunctionSummary;
use tracing_subscriber::EnvFilter;

/// Function-level metadata mining over heterogeneous syntax trees.
#[derive(Parser)]
#[command(name = "funcminer", about = "Extract and label functions from source trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default pipeline configuration
    Init {
        /// Where to write the config (default: funcminer.json)
        path: Option<PathBuf>,
        /// Directory to scan for sources
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Run the pipeline described by a config file (JSON or TOML)
    Run {
        /// Path to the pipeline configuration
        config: PathBuf,
        /// Print the run report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Extract the functions of a single Java file and print them as JSON
    Split {
        /// Source file to split
        file: PathBuf,
        /// Parser family (srcml or antlr)
        #[arg(short, long, default_value = "srcml")]
        parser: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> funcminer::errors::Result<()> {
    match cli.command {
        Commands::Init { path, input } => {
            let path = path.unwrap_or_else(|| PathBuf::from("funcminer.json"));
            let mut config = PipelineConfig::default();
            if let Some(input) = input {
                config.input_dir = input;
            }
            save_config(&path, &config)?;
            println!("Wrote default config to {}", path.display());
        }
        Commands::Run { config, json } => {
            let config = load_config(&config)?;
            let pipeline = Pipeline::new(config)?;
            let report = pipeline.run()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for language in &report.languages {
                    println!("{}", language.language);
                    println!("  Files:       {}", language.file_count);
                    println!("  Skipped:     {}", language.files_skipped);
                    println!("  Stored:      {}", language.stored_count);
                    println!("  Diagnostics: {}", language.diagnostics.len());
                }
                println!(
                    "Stored {} units under {} in {}ms",
                    report.stored_count(),
                    pipeline.config().output_dir.display(),
                    report.duration_ms
                );
            }
        }
        Commands::Split { file, parser } => {
            let parser = parse_parser_family(&parser)?;
            let factory = get_handler_factory(Language::Java, parser);
            let handler = factory.create_handler(&file)?;
            let split = handler.split_into_functions();
            let summaries: Vec<FunctionSummary> =
                split.functions.iter().map(|f| f.summary()).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            let dropped = split
                .diagnostics
                .iter()
                .filter(|d| d.kind.drops_unit())
                .count();
            let omitted = split.diagnostics.len() - dropped;
            if dropped + omitted > 0 {
                eprintln!("{} function(s) dropped, {} field entries omitted", dropped, omitted);
            }
        }
    }
    Ok(())
}

fn parse_parser_family(name: &str) -> funcminer::errors::Result<ParserFamily> {
    match name {
        "srcml" => Ok(ParserFamily::Srcml),
        "antlr" => Ok(ParserFamily::Antlr),
        other => Err(MinerError::Config {
            message: format!("unknown parser '{}', expected 'srcml' or 'antlr'", other),
        }),
    }
}
