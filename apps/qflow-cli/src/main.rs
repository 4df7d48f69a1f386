//! Command-line front end for the questionnaire flow toolkit.
//!
//! This binary is the out-of-core surface's stand-in: it has no upload
//! endpoint, no session handling, no rate limiting — it reads a file path
//! given on the command line and writes to stdout or a given output path.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use qflow_core::analyzer;
use qflow_core::generator::{self, MatrixInput, MultipleChoiceInput, OpenInput, SingleChoiceInput};
use qflow_core::graph::{FlowGraph, RenderOptions};

#[derive(Parser)]
#[clap(name = "qflow")]
#[clap(about = "Read, analyze and render questionnaire flow documents")]
#[clap(version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a questionnaire document and print a short summary.
    Parse {
        /// Path to the questionnaire XML file.
        input: PathBuf,
    },
    /// Run variable reconciliation and dead-end-page analysis.
    Analyze {
        input: PathBuf,
        /// Output format: `text` (default) or `json`.
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Render the page-transition graph as DOT text.
    Graph {
        input: PathBuf,
        /// Rendering preset: cond, vars, bare, or bare-rewrite.
        #[clap(long, default_value = "cond")]
        preset: String,
        /// Write the DOT text to this path instead of stdout.
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Generate an XML fragment for one question shape from a JSON
    /// description.
    Generate {
        /// Question shape: single-choice, multiple-choice, matrix, or open.
        shape: String,
        /// Path to a JSON file describing the question; reads stdin if
        /// omitted.
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(filter).init();

    if let Err(err) = run(cli.command) {
        error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Analyze { input, format } => cmd_analyze(&input, &format),
        Commands::Graph { input, preset, output } => cmd_graph(&input, &preset, output.as_deref()),
        Commands::Generate { shape, input } => cmd_generate(&shape, input.as_deref()),
    }
}

fn read_file(path: &std::path::Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_parse(input: &std::path::Path) -> Result<()> {
    let xml = read_file(input)?;
    let questionnaire = qflow_core::read_questionnaire(&xml)?;

    println!(
        "questionnaire: {}",
        questionnaire.name.as_deref().unwrap_or("(unnamed)")
    );
    println!("pages: {}", questionnaire.pages.len());
    println!("declared variables: {}", questionnaire.declared_variables.len());
    if !questionnaire.warnings.is_empty() {
        println!("warnings:");
        for warning in &questionnaire.warnings {
            println!("  - {warning}");
        }
    }
    Ok(())
}

fn cmd_analyze(input: &std::path::Path, format: &str) -> Result<()> {
    let xml = read_file(input)?;
    let questionnaire = qflow_core::read_questionnaire(&xml)?;
    let report = analyzer::analyze(&questionnaire);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report_text(&report),
    }
    Ok(())
}

fn print_report_text(report: &analyzer::Report) {
    use qflow_core::analyzer::ReportBody;

    for section in &report.sections {
        println!("== {} ==", section.title);
        if let Some(description) = &section.description {
            println!("{description}");
        }
        match &section.body {
            ReportBody::Scalar(value) => println!("{value}"),
            ReportBody::List(items) => {
                for item in items {
                    println!("  - {item}");
                }
            }
            ReportBody::Table(rows) => {
                for row in rows {
                    println!("  {}", row.join(" | "));
                }
            }
            ReportBody::Code(code) => println!("{code}"),
        }
        println!();
    }
}

fn cmd_graph(input: &std::path::Path, preset: &str, output: Option<&std::path::Path>) -> Result<()> {
    let xml = read_file(input)?;
    let questionnaire = qflow_core::read_questionnaire(&xml)?;
    let graph = FlowGraph::build(&questionnaire);
    let options = RenderOptions::preset(preset);
    let dot = graph.to_dot(&questionnaire, options, input.file_name().and_then(|n| n.to_str()));

    match output {
        Some(path) => fs::write(path, dot).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{dot}"),
    }
    Ok(())
}

fn cmd_generate(shape: &str, input: Option<&std::path::Path>) -> Result<()> {
    let json = match input {
        Some(path) => read_file(path)?,
        None => {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let xml = match shape {
        "single-choice" => {
            let parsed: SingleChoiceInput =
                serde_json::from_str(&json).context("parsing single-choice description")?;
            generator::generate_single_choice(&parsed)?
        }
        "multiple-choice" => {
            let parsed: MultipleChoiceInput =
                serde_json::from_str(&json).context("parsing multiple-choice description")?;
            generator::generate_multiple_choice(&parsed)?
        }
        "matrix" => {
            let parsed: MatrixInput = serde_json::from_str(&json).context("parsing matrix description")?;
            generator::generate_matrix(&parsed)?
        }
        "open" => {
            let parsed: OpenInput = serde_json::from_str(&json).context("parsing open-question description")?;
            generator::generate_open(&parsed)?
        }
        other => anyhow::bail!("unknown question shape `{other}`"),
    };

    println!("{xml}");
    Ok(())
}
