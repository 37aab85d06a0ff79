//! Grammafy CLI - turn a LaTeX document into plain prose for grammar checkers

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use grammafy::{
    utils::{format_unknowns, OutputPaths},
    ConversionResult, Grammafier, GrammafyError, GrammafyOptions, GrammafyOutput,
    HandlerRegistry,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "grammafy")]
#[command(version)]
#[command(about = "Grammafy - turn LaTeX documents into plain prose for grammar checkers", long_about = None)]
struct Cli {
    /// LaTeX document to process
    input: PathBuf,

    /// Directory for the output files (defaults to the directory of the input)
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// TOML file with extra command and environment rules
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Accept documents without \begin{document}
    #[arg(long)]
    lenient: bool,

    /// Skip the whitespace and placeholder clean-up (implies --lenient)
    #[arg(long)]
    raw: bool,

    /// Do not splice in files named by \input and \include
    #[arg(long)]
    no_follow: bool,

    /// Extra directory searched for included files (repeatable)
    #[arg(short = 'I', long = "search-path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,

    /// Maximum nesting of included files, footnotes and lists
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Print the cleaned text instead of writing output files
    #[arg(long)]
    stdout: bool,

    /// Log every buffer and inclusion
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and do not print warnings
    #[arg(short, long)]
    quiet: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn options(&self) -> GrammafyOptions {
        let mut options = if self.raw {
            GrammafyOptions::raw()
        } else if self.lenient {
            GrammafyOptions::lenient()
        } else {
            GrammafyOptions::default()
        };
        options.follow_includes = !self.no_follow;
        options.search_paths.clone_from(&self.search_paths);
        if let Some(depth) = self.max_depth {
            options.max_stack_depth = depth;
        }
        options
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(&cli) {
        eprintln!("grammafy: error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> ConversionResult<()> {
    if cli.input.extension().and_then(|ext| ext.to_str()) != Some("tex") {
        tracing::warn!(input = %cli.input.display(), "input is not a .tex file");
    }

    let mut grammafier = Grammafier::with_registry(load_registry(cli.rules.as_deref())?);
    *grammafier.options_mut() = cli.options();

    tracing::info!(input = %cli.input.display(), "processing");
    let output = grammafier.process_file(&cli.input)?;

    if !cli.quiet {
        for warning in &output.warnings {
            eprintln!("grammafy: {}", warning);
        }
    }

    if cli.stdout {
        println!("{}", output.text);
        if let Some(report) = format_unknowns(&output) {
            eprint!("{}", report);
        }
        return Ok(());
    }

    let output_dir = match &cli.output_dir {
        Some(dir) => dir.clone(),
        None => input_dir(&cli.input),
    };
    write_outputs(&cli.input, &output_dir, &output)
}

#[cfg(feature = "cli")]
fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(feature = "cli")]
fn write_outputs(input: &Path, output_dir: &Path, output: &GrammafyOutput) -> ConversionResult<()> {
    let paths = OutputPaths::for_input(input, output_dir);

    write_file(&paths.cleaned, &output.text)?;
    tracing::info!(path = %paths.cleaned.display(), "cleaned text written");

    if let Some(report) = format_unknowns(output) {
        write_file(&paths.unknowns, &report)?;
        tracing::warn!(
            count = output.unknown.len(),
            path = %paths.unknowns.display(),
            "unknown commands found"
        );
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn write_file(path: &Path, content: &str) -> ConversionResult<()> {
    fs::write(path, content).map_err(|e| GrammafyError::IoError {
        message: format!("{}: {}", path.display(), e),
    })
}

#[cfg(all(feature = "cli", feature = "custom-rules"))]
fn load_registry(rules: Option<&Path>) -> ConversionResult<HandlerRegistry> {
    match rules {
        Some(path) => {
            let rules = grammafy::features::CustomRules::load(path)?;
            tracing::info!(path = %path.display(), rules = rules.len(), "custom rules loaded");
            Ok(rules.into_registry())
        }
        None => Ok(HandlerRegistry::new()),
    }
}

#[cfg(all(feature = "cli", not(feature = "custom-rules")))]
fn load_registry(rules: Option<&Path>) -> ConversionResult<HandlerRegistry> {
    match rules {
        Some(_) => Err(GrammafyError::rules(
            "rule files need the custom-rules feature",
        )),
        None => Ok(HandlerRegistry::new()),
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install grammafy --features cli");
    eprintln!("  grammafy [OPTIONS] <FILE>");
}
