use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use missive_core::{
    BlockKind, Brand, Clock, DecodeOutcome, Document, EditorCallbacks, EditorOptions,
    EditorSession, FixedClock, RenderContext, SequentialIds, SystemClock, decode_document,
    encode_document, strip_state,
};

mod config;

#[derive(Parser)]
#[command(version, about = "Missive - inspect and re-render block-built email templates", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Brand file (KDL) used for default colors and the footer
    #[arg(long, global = true, env = "MISSIVE_BRAND")]
    brand: Option<PathBuf>,

    /// Year printed in footer copyright lines (defaults to the current year)
    #[arg(long, global = true, env = "MISSIVE_YEAR")]
    year: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-render a saved template from its embedded builder state
    Render {
        /// Saved template, or `-` for stdin
        input: PathBuf,
    },
    /// Print the embedded block list as JSON
    State {
        /// Saved template, or `-` for stdin
        input: PathBuf,
    },
    /// Build a template from block types with their default content
    New {
        /// Block types in order, e.g. `heading text button footer`
        #[arg(required = true)]
        kinds: Vec<BlockKind>,
    },
    /// Print the visible HTML without builder state
    Strip {
        /// Saved template, or `-` for stdin
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();
    let brand = match &cli.brand {
        Some(path) => config::load_brand(path)?,
        None => Brand::default(),
    };
    let clock: Box<dyn Clock> = match cli.year {
        Some(year) => Box::new(FixedClock(year)),
        None => Box::new(SystemClock),
    };

    let output = match cli.command {
        Commands::Render { input } => render(&read_input(&input)?, brand, clock),
        Commands::State { input } => state(&read_input(&input)?)?,
        Commands::New { kinds } => scaffold(&kinds, brand, clock.as_ref()),
        Commands::Strip { input } => strip_state(&read_input(&input)?),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes()).into_diagnostic()?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n").into_diagnostic()?;
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .into_diagnostic()?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("failed to read {}", path.display())))
}

fn render(saved: &str, brand: Brand, clock: Box<dyn Clock>) -> String {
    let session = EditorSession::new(
        EditorOptions::default()
            .initial_html(saved)
            .brand(brand)
            .clock(clock),
        EditorCallbacks::default(),
    );
    report_outcome(session.load_outcome(), session.blocks().len());
    session.output().to_owned()
}

fn state(saved: &str) -> Result<String> {
    let decoded = decode_document(Some(saved), &mut SequentialIds::new());
    report_outcome(decoded.outcome, decoded.blocks.len());
    serde_json::to_string_pretty(&decoded.blocks).into_diagnostic()
}

fn scaffold(kinds: &[BlockKind], brand: Brand, clock: &dyn Clock) -> String {
    let mut doc = Document::new(brand);
    for &kind in kinds {
        doc.add_block(kind);
    }
    encode_document(
        doc.blocks(),
        &RenderContext::from_clock(doc.brand(), &clock),
    )
}

fn report_outcome(outcome: DecodeOutcome, blocks: usize) {
    match outcome {
        DecodeOutcome::Empty => tracing::info!("input is empty"),
        DecodeOutcome::Restored => tracing::info!(blocks, "restored builder state"),
        DecodeOutcome::Legacy => {
            tracing::info!("no builder state found, treating input as a single text block")
        }
        DecodeOutcome::Malformed => {
            tracing::warn!("builder state is unreadable, treating input as a single text block")
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
