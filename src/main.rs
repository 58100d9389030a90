mod analysis;
mod common;
mod decode;
mod parsing;
mod shape;

use argh::FromArgs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use analysis::{
    generate_game_length_plot, generate_iteration_field_plots, generate_iteration_scatter,
    generate_ply_field_plots,
};
use common::{LogData, ShapeSummary};

/// Analyze (and visualize) PlyMouth CSV game logs
#[derive(FromArgs, Debug)]
struct Args {
    /// the folder containing the PlyMouth CSV logs
    #[argh(positional)]
    directory: PathBuf,

    /// names of unnamed fields (iteration-level)
    #[argh(positional)]
    unnamed_fields: Vec<String>,

    /// print per-iteration detail while running
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// open each figure in the platform image viewer after saving
    #[argh(switch, short = 'i')]
    interactive: bool,

    /// clip field plots to mean + 3 sigma to suppress outliers
    #[argh(switch, short = 'c')]
    compact: bool,

    /// output directory for rendered figures (default: plots)
    #[argh(option, short = 'o', default = "PathBuf::from(\"plots\")")]
    output: PathBuf,
}

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Shape analysis error: {0}")]
    Shape(#[from] shape::ShapeError),

    #[error("Plot generation error: {0}")]
    Plot(#[from] common::PlotError),

    #[error("Failed to prepare output directory: {0}")]
    OutputDir(std::io::Error),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    // Validate arguments before touching any file.
    if !args.directory.is_dir() {
        eprintln!(
            "Not a directory (or does not exist): {}",
            args.directory.display()
        );
        std::process::exit(1);
    }
    if args.unnamed_fields.is_empty() {
        eprintln!("At least one unnamed (iteration-level) field name is required");
        std::process::exit(1);
    }

    let data = parsing::load_logs(&args.directory)?;
    let block_width = args.unnamed_fields.len();
    let summary = shape::analyze_shape(&data, block_width)?;

    print_summary(&data, &summary, &args);

    let decoded = decode::decode_logs(&data, &summary, block_width);
    if args.verbose {
        println!(
            "> Decoded {} ply records and {} iteration blocks.",
            decoded.ply_records.len(),
            decoded.total_blocks()
        );
    }

    // The output directory is rebuilt from scratch on every run.
    if args.output.exists() {
        fs::remove_dir_all(&args.output).map_err(AnalysisError::OutputDir)?;
    }
    fs::create_dir_all(&args.output).map_err(AnalysisError::OutputDir)?;

    let mut figures = Vec::new();
    figures.push(generate_game_length_plot(&data.game_lengths, &args.output)?);
    figures.extend(generate_ply_field_plots(
        &decoded,
        &data.schema,
        summary.max_game_length,
        &args.output,
        args.compact,
    )?);
    if summary.max_iterations > 0 {
        figures.extend(generate_iteration_field_plots(
            &decoded,
            &args.unnamed_fields,
            &args.output,
        )?);
        figures.push(generate_iteration_scatter(
            &decoded,
            &args.unnamed_fields,
            &args.output,
        )?);
    }

    for figure in &figures {
        println!("Wrote {}", figure.display());
        if args.interactive {
            common::plots::display_figure(figure);
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_summary(data: &LogData, summary: &ShapeSummary, args: &Args) {
    println!(
        "Read {} games ({} plies).",
        data.game_lengths.len(),
        data.rows.len()
    );
    println!("> Game lengths: {:?}", data.game_lengths);
    if args.verbose {
        for (source, length) in data.sources.iter().zip(&data.game_lengths) {
            println!(">   {}: {} plies", source.display(), length);
        }
    }
    println!("> Maximum game length: {}", summary.max_game_length);
    println!("> Maximum row length: {}", summary.max_row_length);
    println!(
        "> Number of named fields: {} {:?}",
        data.named_field_count(),
        data.schema
    );
    println!(
        "> Number of unnamed fields (per iteration): {} {:?}",
        args.unnamed_fields.len(),
        args.unnamed_fields
    );
    println!("> Maximum iterations: {}", summary.max_iterations);
    println!(
        "> Iteration counts: {:?} {:?}",
        summary.iteration_row_counts, summary.iteration_block_population
    );
    if args.verbose {
        println!("{}", shape::format_iteration_table(summary));
    }
}
