//! pdfdiff CLI - highlight differences between two PDF documents

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfdiff::{
    compare::{DEFAULT_POSITION_TOLERANCE, DEFAULT_SIMILARITY_THRESHOLD},
    render::to_json,
    ComparisonReport, CompareOptions, FailureStage, JsonFormat, PageSelection, PdfDiff, PdfParser,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdfdiff")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Highlight page-level differences between two PDF documents", long_about = None)]
struct Cli {
    /// Original PDF file
    #[arg(value_name = "ORIGINAL")]
    original: Option<PathBuf>,

    /// Modified PDF file
    #[arg(value_name = "MODIFIED")]
    modified: Option<PathBuf>,

    /// Directory for page_{n}_differences.png images
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    compare: CompareArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Minimum text similarity (0-1) for two units to be paired
    #[arg(long, env = "PDFDIFF_SIMILARITY", default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    similarity: f64,

    /// Maximum distance in points between paired units
    #[arg(long, env = "PDFDIFF_POSITION", default_value_t = DEFAULT_POSITION_TOLERANCE)]
    position: f64,

    /// Do not report font, size or colour changes
    #[arg(long)]
    ignore_formatting: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Pixels per point for difference images
    #[arg(long, default_value_t = pdfdiff::render::DEFAULT_SCALE)]
    scale: f32,

    /// Compare pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Record pages that fail to decode and keep going
    #[arg(long)]
    lenient: bool,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the text units extracted from a PDF as JSON
    Units {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page to dump (all pages if not specified)
        #[arg(short, long)]
        page: Option<u32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Units {
            input,
            page,
            compact,
        }) => cmd_units(&input, page, compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.original, cli.modified, cli.output) {
            (Some(original), Some(modified), Some(output)) => {
                cmd_compare(&original, &modified, &output, &cli.compare)
            }
            _ => {
                println!(
                    "{}",
                    "Usage: pdfdiff <ORIGINAL> <MODIFIED> <OUTPUT_DIR>".yellow()
                );
                println!("       pdfdiff --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn build_diff(args: &CompareArgs) -> Result<PdfDiff, Box<dyn std::error::Error>> {
    let page_selection = match args.pages.as_deref() {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let compare_options = CompareOptions::new()
        .with_similarity_threshold(args.similarity)
        .with_position_tolerance(args.position)
        .with_ignore_formatting(args.ignore_formatting)
        .with_parallel(args.parallel);
    compare_options.validate()?;

    let render_options = RenderOptions::new().with_scale(args.scale);
    render_options.validate()?;

    log::debug!("compare options: {:?}", compare_options);

    let mut diff = PdfDiff::new()
        .with_compare_options(compare_options)
        .with_render_options(render_options)
        .with_pages(page_selection);
    if args.lenient {
        diff = diff.lenient();
    }
    Ok(diff)
}

fn cmd_compare(
    original: &Path,
    modified: &Path,
    output: &Path,
    args: &CompareArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let diff = build_diff(args)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Comparing {} with {}...",
        original.display(),
        modified.display()
    ));

    let report = diff.run(original, modified, output);
    pb.finish_and_clear();
    let report = report?;

    print_report(&report, output);

    if let Some(path) = args.report.as_deref() {
        let json = to_json(&report, json_format(args.compact))?;
        fs::write(path, &json)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn print_report(report: &ComparisonReport, output: &Path) {
    println!("{}", "Comparison".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {} / {}",
        "Pages".bold(),
        report.original_pages,
        report.modified_pages
    );

    if report.is_identical() {
        println!("{}", "No differences found".green());
        return;
    }

    for page in report.pages_with_differences() {
        println!(
            "{} {}: {} differences",
            "Page".bold(),
            page.page,
            page.differences.len()
        );
        for difference in &page.differences {
            println!("  {} {}", "•".dimmed(), difference);
        }
    }

    for failure in &report.failures {
        let stage = match failure.stage {
            FailureStage::Decode => "decode",
            FailureStage::Render => "render",
        };
        eprintln!(
            "{} page {} ({}): {}",
            "Warning:".yellow().bold(),
            failure.page,
            stage,
            failure.message
        );
    }

    let images = report.images();
    if !images.is_empty() {
        println!("\n{} {}", "Output files in".green().bold(), output.display());
        for (i, image) in images.iter().enumerate() {
            let branch = if i + 1 == images.len() { "└─" } else { "├─" };
            let name = image.file_name().unwrap_or_default().to_string_lossy();
            println!("  {} {}", branch.dimmed(), name);
        }
    }
}

fn cmd_units(
    input: &Path,
    page: Option<u32>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;

    let json = match page {
        Some(n) => to_json(&parser.extract_units(n)?, json_format(compact))?,
        None => {
            let pages = parser
                .page_numbers()
                .into_iter()
                .map(|n| parser.extract_units(n))
                .collect::<Result<Vec<_>, _>>()?;
            to_json(&pages, json_format(compact))?
        }
    };

    println!("{}", json);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), parser.version());
    println!("{}: {}", "Pages".bold(), parser.page_count());

    let mut units = 0;
    let mut failed = 0;
    for n in parser.page_numbers() {
        match parser.extract_units(n) {
            Ok(page_units) => units += page_units.len(),
            Err(e) => {
                log::warn!("page {}: {}", n, e);
                failed += 1;
            }
        }
    }
    println!("{}: {}", "Text units".bold(), units);
    if failed > 0 {
        println!("{}: {}", "Unreadable pages".bold(), failed);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfdiff".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page-level PDF comparison tool");
    println!();
    println!("License: MIT");
}
