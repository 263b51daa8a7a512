//! Immune cell population analysis CLI.
//!
//! Thin driver over the analysis library: loads a wide cell-count CSV and
//! runs one of the three core computations.

use clap::{Parser, Subcommand};
use immunopop::baseline::baseline_summary;
use immunopop::compare::compare_responders;
use immunopop::data::CellCountStore;
use immunopop::error::Result;
use immunopop::freq::compute_relative_frequencies;
use std::path::PathBuf;

/// Immune cell population analysis
#[derive(Parser)]
#[command(name = "immunopop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute relative population frequencies per sample
    Frequencies {
        /// Path to the wide cell-count CSV
        #[arg(short = 'c', long)]
        csv: PathBuf,

        /// Output path for the frequency table TSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compare responders vs non-responders (melanoma PBMC, miraclib)
    Compare {
        /// Path to the wide cell-count CSV
        #[arg(short = 'c', long)]
        csv: PathBuf,

        /// Output path for the comparison table TSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Summarize the baseline cohort (timepoint 0)
    Baseline {
        /// Path to the wide cell-count CSV
        #[arg(short = 'c', long)]
        csv: PathBuf,

        /// Population for the conditional mean
        #[arg(short, long, default_value = "b_cell")]
        population: String,

        /// Sex for the conditional mean
        #[arg(short, long, default_value = "M")]
        sex: String,

        /// Response for the conditional mean
        #[arg(short, long, default_value = "yes")]
        response: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Frequencies { csv, output } => cmd_frequencies(&csv, &output),
        Commands::Compare { csv, output } => cmd_compare(&csv, &output),
        Commands::Baseline {
            csv,
            population,
            sex,
            response,
            format,
        } => cmd_baseline(&csv, &population, &sex, &response, &format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_store(csv_path: &PathBuf) -> Result<CellCountStore> {
    eprintln!("Loading data from {:?}...", csv_path);
    let store = CellCountStore::from_csv(csv_path)?;
    eprintln!(
        "Loaded {} samples, {} count rows",
        store.n_samples(),
        store.count_rows().len()
    );
    Ok(store)
}

/// Compute the relative frequency table
fn cmd_frequencies(csv_path: &PathBuf, output_path: &PathBuf) -> Result<()> {
    let store = load_store(csv_path)?;

    let table = compute_relative_frequencies(store.count_rows())?;

    eprintln!("Writing {} rows to {:?}...", table.len(), output_path);
    table.to_tsv(output_path)?;
    Ok(())
}

/// Run the responder vs non-responder comparison
fn cmd_compare(csv_path: &PathBuf, output_path: &PathBuf) -> Result<()> {
    let store = load_store(csv_path)?;

    let table = compare_responders(store.samples(), store.count_rows())?;

    eprintln!("Writing results to {:?}...", output_path);
    table.to_tsv(output_path)?;

    eprintln!("Done! {} populations tested", table.len());
    let n_sig = table.significant().len();
    eprintln!("  {} significant at p < 0.05", n_sig);
    Ok(())
}

/// Summarize the baseline cohort
fn cmd_baseline(
    csv_path: &PathBuf,
    population: &str,
    sex: &str,
    response: &str,
    format: &str,
) -> Result<()> {
    let store = load_store(csv_path)?;

    let summary = baseline_summary(store.samples(), store.count_rows(), population, sex, response);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print!("{}", summary),
    }
    Ok(())
}
