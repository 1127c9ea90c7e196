// System status display — artifact presence, corpus counts, data quality.

use anyhow::Result;
use colored::Colorize;

use crate::analysis::Analysis;
use crate::config::Config;

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    if config.require_data().is_err() {
        println!("Data: not found in {}", config.data_dir.display());
        println!("\nRun the extraction pipeline (or set KREIDE_DATA_DIR) first.");
        return Ok(());
    }
    println!("Data: {}", config.data_dir.display());

    if config.require_model().is_err() {
        println!("Model artifact: not found in {}", config.model_dir.display());
        println!("\nRun the offline modeling pipeline (or set KREIDE_MODEL_DIR) first.");
        return Ok(());
    }
    println!("Model artifact: {}", config.artifact_path().display());

    let analysis = Analysis::load(config)?;
    let overview = analysis.overview();

    println!(
        "Corpus: {} Sätze aus {} Kernlehrplänen ({} Bundesländer)",
        overview.saetze, overview.kernlehrplaene, overview.bundeslaender
    );
    println!(
        "Topics: {} (modelled {})",
        overview.themen, overview.generated_at
    );

    if overview.residual_clamped > 0 {
        println!(
            "{}",
            format!(
                "Data quality: {} of {} probability rows had their residual clamped",
                overview.residual_clamped, overview.saetze
            )
            .yellow()
        );
    } else {
        println!("Data quality: all residual probabilities within [0, 1]");
    }

    if config.embedding_files_present() {
        println!("Search backend: embedding model ({})", config.embedding_dir().display());
    } else {
        println!("Search backend: keyword fallback (no embedding model on disk)");
    }

    Ok(())
}
