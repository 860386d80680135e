//! qem-quadrics - compute per-vertex error quadrics for an OBJ mesh.
//!
//! Usage: qem-quadrics [OPTIONS] <INPUT>

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use qemcrate_core::Progress;
use qemcrate_quadric::{QuadricConfig, QuadricMesh, QuadricPipeline};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qem-quadrics")]
#[command(author, version, about = "Per-vertex quadric error metrics for OBJ meshes", long_about = None)]
struct Cli {
    /// Input mesh file (.obj)
    input: PathBuf,

    /// Relative tolerance below which a face counts as degenerate
    #[arg(long, default_value_t = 1e-10)]
    tolerance: f64,

    /// Faces or vertices processed between progress updates
    #[arg(long, default_value_t = 4096)]
    batch_size: usize,

    /// Use single-threaded execution
    #[arg(long)]
    sequential: bool,

    /// Show a progress bar on stderr
    #[arg(long)]
    progress: bool,

    /// Print the quadric of this 0-based vertex
    #[arg(long)]
    vertex: Option<usize>,

    /// Print every diagnostic instead of a count
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = QuadricConfig::new()
        .with_degeneracy_tolerance(cli.tolerance)
        .with_batch_size(cli.batch_size)
        .with_parallel(!cli.sequential);
    debug!("{:?}", config);

    let mut pipeline = QuadricPipeline::new(config);
    if cli.progress {
        pipeline = pipeline.with_progress(create_progress());
    }

    let result = pipeline
        .run_path(&cli.input)
        .with_context(|| format!("computing quadrics for {}", cli.input.display()))?;

    print_summary(&result, cli.diagnostics);

    if let Some(vertex) = cli.vertex {
        let quadric = result
            .quadrics()
            .get(vertex)
            .with_context(|| format!("vertex {} out of range ({} vertices)", vertex, result.vertices().len()))?;
        println!("Quadric of vertex {} at {:?}:", vertex, result.vertices()[vertex].coords.as_slice());
        println!("{}", quadric.matrix());
    }

    Ok(())
}

fn print_summary(result: &QuadricMesh, show_diagnostics: bool) {
    println!("Vertices:         {}", result.vertices().len());
    println!("Faces:            {}", result.faces().len());
    println!("Edges:            {}", result.edges().len());
    println!("Planes:           {}", result.planes().len());
    println!("Degenerate faces: {}", result.degenerate_faces().len());
    println!("Diagnostics:      {}", result.diagnostics().len());

    if show_diagnostics {
        for diagnostic in result.diagnostics() {
            println!("  {}", diagnostic);
        }
    }
}

/// Progress bar on stderr, one line per stage
fn create_progress() -> Progress {
    Progress::new(|current, total, message| {
        if total == 0 {
            return;
        }
        let percent = (current * 100) / total;
        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}
