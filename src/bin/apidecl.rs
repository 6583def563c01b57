use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use apidecl::{
    generate_go_file, parse_api_file, read_source, resolve_sources, FetchContext, GenOptions,
    GenerationReport, LiteralPolicy,
};

/// Generate typed Go declarations from JSON API description files
#[derive(Parser, Debug)]
#[command(name = "apidecl", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one Go file per schema file into the output directory
    Generate(GenerateArgs),
    /// Print each block's name and classified kind
    Inspect {
        /// Schema file path or http(s) URL
        input: String,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Schema files, directories of *.json files, or http(s) URLs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    out: PathBuf,

    /// Go package name (default: derived from each schema file name)
    #[arg(long)]
    package: Option<String>,

    /// JSON file with generator options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail a block whose event literals look malformed instead of warning
    #[arg(long)]
    strict: bool,

    /// Embed the host handle anonymously instead of naming the field
    #[arg(long)]
    embed_handle: bool,

    /// Do not render descriptions as comments
    #[arg(long)]
    no_docs: bool,

    /// Also emit constructors and static methods of classes
    #[arg(long)]
    lower_statics: bool,

    /// Cache directory for schemas fetched from URLs
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Re-fetch URL inputs even when cached
    #[arg(long)]
    refresh: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(false)` when some input or block failed.
fn run(command: Command) -> Result<bool, String> {
    match command {
        Command::Generate(args) => run_generate(args),
        Command::Inspect { input } => run_inspect(&input),
    }
}

fn run_generate(args: GenerateArgs) -> Result<bool, String> {
    let options = build_options(&args)?;
    let fetch = FetchContext::new(args.cache_dir.clone(), args.refresh);
    let sources = resolve_sources(&args.inputs, &fetch).map_err(|e| e.to_string())?;
    if sources.is_empty() {
        return Err("no schema files found".to_string());
    }

    let mut total = GenerationReport::default();
    let mut failed_inputs = 0usize;
    for source in &sources {
        let id = source.display_id();
        let result = read_source(source, &fetch)
            .and_then(|input| generate_go_file(source, &input, &args.out, &options));
        match result {
            Ok((path, report)) => {
                info!("{id} -> {}: {report}", path.display());
                total.merge(report);
            }
            Err(err) => {
                error!("{id}: {err}");
                failed_inputs += 1;
            }
        }
    }

    println!(
        "{} input(s), {} failed to load; {total}",
        sources.len(),
        failed_inputs
    );
    Ok(failed_inputs == 0 && total.is_clean())
}

fn build_options(args: &GenerateArgs) -> Result<GenOptions, String> {
    let mut options = match &args.config {
        Some(path) => GenOptions::from_path(path).map_err(|e| e.to_string())?,
        None => GenOptions::default(),
    };
    if let Some(package) = &args.package {
        options.package = Some(package.clone());
    }
    if args.strict {
        options.literal_policy = LiteralPolicy::Strict;
    }
    if args.embed_handle {
        options.embed_handle = true;
    }
    if args.no_docs {
        options.docs = false;
    }
    if args.lower_statics {
        options.lower_statics = true;
    }
    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

fn run_inspect(input: &str) -> Result<bool, String> {
    let fetch = FetchContext::new(None, false);
    let sources = resolve_sources(&[input.to_string()], &fetch).map_err(|e| e.to_string())?;
    for source in &sources {
        let text = read_source(source, &fetch).map_err(|e| e.to_string())?;
        let file = parse_api_file(&text).map_err(|e| format!("{}: {e}", source.display_id()))?;
        for block in &file.blocks {
            println!("{}\t{}", block.base.kind(), block.base.name);
        }
    }
    Ok(true)
}
