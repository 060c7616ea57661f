//! Quiz recommender evaluation runner
//!
//! Runs test cases against the recommendation service, prints a summary and
//! writes results and charts to the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use evals::{
    get_cases, load_config, pipeline, run_evaluation, select_cases, Config, RunOptions,
    RESULTS_FILE,
};
use llm::EmbeddingClient;
use recommender::{BlogClient, RecommenderClient};

#[derive(Parser)]
#[command(name = "quiz-eval")]
#[command(about = "Evaluation framework for the quiz recommender")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the recommendation service
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the evaluation
    Run {
        /// Only run cases whose name contains this pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Directory containing TOML case files (or set QUIZ_EVAL_CASES env var)
        #[arg(long)]
        cases_dir: Option<PathBuf>,

        /// Only run built-in cases (ignore --cases-dir)
        #[arg(long)]
        builtin_only: bool,

        /// Where to write results and charts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,

        /// Show the scored text for each case
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the summary and redraw charts from saved results
    Report {
        /// Results file (defaults to evaluation_results.json in the output directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write charts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List available test cases
    List {
        /// Directory containing TOML case files (or set QUIZ_EVAL_CASES env var)
        #[arg(long)]
        cases_dir: Option<PathBuf>,

        /// Only list built-in cases
        #[arg(long)]
        builtin_only: bool,
    },

    /// Generate a blog article on a subject
    Blog {
        /// Article subject
        subject: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.service.endpoint = endpoint;
    }
    if let Some(secs) = cli.timeout_secs {
        config.service.timeout_secs = secs;
    }
    config.service.validate().context("Invalid service configuration")?;

    match cli.command {
        Commands::Run {
            filter,
            cases_dir,
            builtin_only,
            output_dir,
            no_charts,
            verbose,
        } => {
            let cases_dir = if builtin_only { None } else { cases_dir_or_env(cases_dir) };
            let options = RunOptions {
                output_dir: output_dir.unwrap_or_else(|| config.output.dir.clone()),
                charts: !no_charts,
                verbose,
            };
            run(&config, cases_dir.as_deref(), filter.as_deref(), &options).await?;
        }
        Commands::Report { input, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
            let input = input.unwrap_or_else(|| output_dir.join(RESULTS_FILE));
            pipeline::report(&input, &output_dir)?;
        }
        Commands::List {
            cases_dir,
            builtin_only,
        } => {
            let cases_dir = if builtin_only { None } else { cases_dir_or_env(cases_dir) };
            list_cases(cases_dir.as_deref())?;
        }
        Commands::Blog { subject } => {
            generate_blog(&config, &subject).await?;
        }
    }

    Ok(())
}

fn cases_dir_or_env(cases_dir: Option<PathBuf>) -> Option<PathBuf> {
    cases_dir.or_else(|| std::env::var("QUIZ_EVAL_CASES").ok().map(PathBuf::from))
}

async fn run(
    config: &Config,
    cases_dir: Option<&Path>,
    filter: Option<&str>,
    options: &RunOptions,
) -> Result<()> {
    let client = RecommenderClient::new(&config.service)?;

    println!("{}", "=".repeat(60));
    println!("QUIZ RECOMMENDER EVALUATION");
    println!("{}", "=".repeat(60));
    println!("Service:   {}", client.endpoint());
    println!("Embedding: {}", config.embedding.model);

    println!("\nLoading embedding model...");
    let embedder = EmbeddingClient::load(config.embedding.clone())
        .await
        .context("Failed to load embedding model")?;

    let cases = select_cases(get_cases(cases_dir)?, filter);
    if cases.is_empty() {
        println!("No test cases match the filter");
        return Ok(());
    }

    println!("Running {} test case(s)...", cases.len());
    let outcome = run_evaluation(client, embedder, &cases, options).await?;

    let code = outcome.exit_code();
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

fn list_cases(cases_dir: Option<&Path>) -> Result<()> {
    let cases = get_cases(cases_dir)?;
    println!("Available test cases:\n");
    for case in cases {
        println!("  {}", case.name);
        println!("    Expected program: {}", case.expected_program);
        println!("    Answers: {}", case.answers.len());
        println!("    Keywords: {}", case.expected_keywords.join(", "));
        println!();
    }
    Ok(())
}

async fn generate_blog(config: &Config, subject: &str) -> Result<()> {
    let client = BlogClient::new(&config.service)?;

    println!("Generating article on: {}\n", subject);
    let article = client
        .generate(subject)
        .await
        .context("Blog generation failed")?;

    println!("{}", article.markdown);

    println!("\n{}", "-".repeat(40));
    println!("Expertise report");
    for (label, score) in article.expertise_report.entries() {
        println!("  {:<22} {:.2}", label, score);
    }

    if !article.sources.is_empty() {
        println!("\nSources:");
        for source in &article.sources {
            println!("  - {}", source);
        }
    }

    Ok(())
}
