use super::read_entry;
use crate::cli::MapArgs;
use crate::config::PartialCorrespondenceConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use rayon::prelude::*;
use resmap::core::models::entry::Entry;
use resmap::engine::config::CorrespondenceConfig;
use resmap::engine::progress::ProgressReporter;
use resmap::workflows::correspond::{self, CorrespondenceRow, EntryCorrespondence};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub fn run(args: MapArgs) -> Result<()> {
    let config = PartialCorrespondenceConfig::load(&args.engine)?.merge_with_cli(&args.engine)?;
    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)?;
    }

    info!("Processing {} residue store(s).", args.input.len());
    let progress_handler = CliProgressHandler::new();
    let outcomes: Vec<Result<Vec<String>>> = args
        .input
        .par_iter()
        .map(|path| process_entry(path, &config, args.output.as_deref(), &progress_handler))
        .collect();
    progress_handler.finish();

    let mut failures = 0;
    for (path, outcome) in args.input.iter().zip(outcomes) {
        match outcome {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(e) => {
                error!("Failed to process {:?}: {}", path, e);
                eprintln!("Error: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Other(anyhow::anyhow!(
            "{} of {} input(s) could not be processed",
            failures,
            args.input.len()
        )));
    }
    Ok(())
}

fn process_entry(
    path: &Path,
    config: &CorrespondenceConfig,
    output_dir: Option<&Path>,
    progress_handler: &CliProgressHandler,
) -> Result<Vec<String>> {
    let entry = read_entry(path)?;
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let result = correspond::run(&entry, config, &reporter)?;

    match output_dir {
        Some(dir) => {
            let report = report_path(dir, path);
            write_report(&report, &result.rows(&entry, config))?;
            info!("Wrote {} correspondence(s) to {:?}", result.chains.len(), report);
            Ok(vec![format!("{} -> {}", path.display(), report.display())])
        }
        None => Ok(summary_lines(&entry, &result)),
    }
}

/// One tab-separated line per chain and model: key, model, strategy, coverage, gapped sequence.
fn summary_lines(entry: &Entry, result: &EntryCorrespondence) -> Vec<String> {
    result
        .chains
        .iter()
        .filter_map(|item| {
            let chain = entry.chain(item.chain_id)?;
            let model = entry.model(item.model_id)?;
            let mapping = &item.correspondence.mapping;
            Some(format!(
                "{}\t{}\t{}\t{}/{}\t{}",
                chain.key(&entry.id_code),
                item.model_number,
                item.correspondence.strategy,
                mapping.coverage(),
                mapping.len(),
                mapping.to_gapped_string(model.residues())
            ))
        })
        .collect()
}

/// Names the report after the input file, without `.gz` and `.toml` suffixes.
fn report_path(dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("entry");
    let stem = name.strip_suffix(".gz").unwrap_or(name);
    let stem = stem.strip_suffix(".toml").unwrap_or(stem);
    dir.join(format!("{stem}.csv"))
}

fn write_report(path: &Path, rows: &[CorrespondenceRow]) -> Result<()> {
    let report_error = |source| CliError::Report {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(report_error)?;
    for row in rows {
        writer.serialize(row).map_err(report_error)?;
    }
    writer.flush()?;
    Ok(())
}
