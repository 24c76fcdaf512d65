// ABOUTME: CLI binary for the narrator pipeline.
// ABOUTME: Reads article HTML or flat text from a file or stdin and prints the requested stage's output.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use narrator_core::{InputKind, Lexicon, Narrator, Options, Stage};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "narrator")]
#[command(about = "Turn encyclopedia article HTML into highlighted narration text")]
struct Args {
    /// Input file: article HTML, or flat text with --text. Reads stdin when absent or "-"
    #[arg()]
    input: Option<PathBuf>,

    /// Last stage to run: convert, purify, prepare or highlight
    #[arg(short = 's', long = "stage", default_value = "highlight")]
    stage: Stage,

    /// Treat the input as already-flat text and skip HTML conversion
    #[arg(long = "text")]
    text: bool,

    /// Newline-delimited word list used to spot foreign words
    #[arg(short = 'l', long = "lexicon", env = "NARRATOR_LEXICON")]
    lexicon: Option<PathBuf>,

    /// JSON file with pipeline options (missing fields keep their defaults)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Character count above which a sentence is highlighted as long
    #[arg(long = "long-threshold")]
    long_threshold: Option<usize>,

    /// Output {"stage", "content"} as JSON instead of raw text
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_options(args: &Args) -> Result<Options> {
    let mut opts = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Options::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Options::default(),
    };
    if let Some(threshold) = args.long_threshold {
        opts.highlight.long_sentence_threshold = threshold;
    }
    // A single run never sees the same text twice.
    opts.highlight.cache_capacity = 0;
    Ok(opts)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading input {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading input from stdin")?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut builder = Narrator::builder().options(load_options(args)?);
    match &args.lexicon {
        Some(path) => builder = builder.lexicon(Lexicon::load(path)?),
        None if args.stage == Stage::Highlight => {
            bail!("--lexicon (or NARRATOR_LEXICON) is required for the highlight stage")
        }
        None => {}
    }
    let narrator = builder.build();

    let input = read_input(args.input.as_deref())?;
    let kind = if args.text {
        InputKind::Text
    } else {
        InputKind::Html
    };

    let start = Instant::now();
    let content = narrator.run(&input, kind, args.stage)?;
    let elapsed = start.elapsed();
    debug!(stage = %args.stage, input_len = input.len(), output_len = content.len(), "pipeline done");

    let output_str = if args.json_output {
        serde_json::to_string_pretty(&json!({ "stage": args.stage, "content": content }))?
    } else {
        content
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output_str)
            .with_context(|| format!("writing to {}", output_path.display()))?;
    } else {
        println!("{}", output_str);
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
