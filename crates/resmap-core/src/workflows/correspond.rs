use crate::core::models::entry::Entry;
use crate::core::models::ids::{ChainId, ModelId};
use crate::engine::align::Blosum62Aligner;
use crate::engine::cache::MappingCache;
use crate::engine::config::CorrespondenceConfig;
use crate::engine::dispatch::{Correspondence, Strategy, correspond};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// The correspondence computed for one model of one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainCorrespondence {
    pub chain: char,
    pub chain_id: ChainId,
    pub model_id: ModelId,
    pub model_number: i32,
    pub correspondence: Correspondence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryCorrespondence {
    pub id_code: String,
    /// One result per (chain, model) pair, in chain order then model order.
    pub chains: Vec<ChainCorrespondence>,
}

/// One canonical position of one chain/model, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrespondenceRow {
    pub entry: String,
    pub chain: char,
    pub model: i32,
    pub position: usize,
    pub canonical: char,
    pub strategy: Strategy,
    pub residue_name: Option<String>,
    pub sequence_number: Option<isize>,
    pub insertion_code: Option<char>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl EntryCorrespondence {
    /// Flattens every mapping into per-position rows, with coordinates of the
    /// configured proxy atom where present.
    pub fn rows(&self, entry: &Entry, config: &CorrespondenceConfig) -> Vec<CorrespondenceRow> {
        let mut rows = Vec::new();
        for result in &self.chains {
            let (Some(chain), Some(model)) =
                (entry.chain(result.chain_id), entry.model(result.model_id))
            else {
                continue;
            };
            let mapping = &result.correspondence.mapping;
            let residues = mapping.resolve(model.residues());
            let coords = mapping.atom_coords(model.residues(), &config.ca_atom_name);

            for (position, (&canonical, (residue, coord))) in chain
                .sequence()
                .iter()
                .zip(residues.into_iter().zip(coords))
                .enumerate()
            {
                rows.push(CorrespondenceRow {
                    entry: self.id_code.clone(),
                    chain: result.chain,
                    model: result.model_number,
                    position,
                    canonical,
                    strategy: result.correspondence.strategy,
                    residue_name: residue.map(|r| r.name.clone()),
                    sequence_number: residue.map(|r| r.sequence_number),
                    insertion_code: residue.and_then(|r| r.insertion_code),
                    x: coord.map(|p| p.x),
                    y: coord.map(|p| p.y),
                    z: coord.map(|p| p.z),
                });
            }
        }
        rows
    }
}

/// Computes the correspondence for a single model.
pub fn correspond_model(
    entry: &Entry,
    model_id: ModelId,
    config: &CorrespondenceConfig,
) -> Option<Correspondence> {
    let model = entry.model(model_id)?;
    let chain = entry.chain(model.chain_id)?;
    let aligner = Blosum62Aligner::from_config(&config.alignment);
    Some(correspond(
        chain.sequence(),
        chain.missing(),
        model.residues(),
        &aligner,
    ))
}

#[instrument(skip_all, name = "correspondence_workflow", fields(entry = %entry.id_code))]
pub fn run(
    entry: &Entry,
    config: &CorrespondenceConfig,
    reporter: &ProgressReporter,
) -> Result<EntryCorrespondence, EngineError> {
    let mut cache = MappingCache::new();
    run_with_cache(entry, config, &mut cache, reporter)
}

/// Like [`run`], reusing and filling a caller-held cache.
///
/// The cache must only ever hold results for models of `entry`.
pub fn run_with_cache(
    entry: &Entry,
    config: &CorrespondenceConfig,
    cache: &mut MappingCache,
    reporter: &ProgressReporter,
) -> Result<EntryCorrespondence, EngineError> {
    config.validate()?;
    let aligner = Blosum62Aligner::from_config(&config.alignment);

    let targets: Vec<_> = entry
        .chains()
        .filter(|(_, chain)| {
            if chain.sequence().is_empty() {
                debug!("Skipping chain '{}' without a canonical sequence.", chain.ident);
                return false;
            }
            true
        })
        .flat_map(|(chain_id, chain)| {
            entry
                .models_of(chain_id)
                .map(move |(model_id, model)| (chain_id, chain, model_id, model))
        })
        .collect();

    reporter.report(Progress::EntryStart {
        id_code: entry.id_code.clone(),
        total_models: targets.len() as u64,
    });
    info!(
        "Mapping {} model(s) across {} chain(s).",
        targets.len(),
        entry.chain_count()
    );

    let mut chains = Vec::with_capacity(targets.len());
    for (chain_id, chain, model_id, model) in targets {
        let correspondence = cache
            .get_or_insert_with(model_id, || {
                correspond(chain.sequence(), chain.missing(), model.residues(), &aligner)
            })
            .clone();

        debug!(
            chain = %chain.ident,
            model = model.number,
            strategy = %correspondence.strategy,
            coverage = correspondence.mapping.coverage(),
            "Mapped model."
        );
        if let Some(reason) = &correspondence.fallback {
            reporter.report(Progress::Message(format!(
                "{} model {}: aligned by sequence ({})",
                chain.key(&entry.id_code),
                model.number,
                reason
            )));
        }
        reporter.report(Progress::ModelMapped {
            chain: chain.ident,
            model: model.number,
            strategy: correspondence.strategy,
        });

        chains.push(ChainCorrespondence {
            chain: chain.ident,
            chain_id,
            model_id,
            model_number: model.number,
            correspondence,
        });
    }

    reporter.report(Progress::EntryFinish);
    Ok(EntryCorrespondence {
        id_code: entry.id_code.clone(),
        chains,
    })
}

/// Alpha-carbon coordinates of canonical positions `[start, end)` of a chain.
///
/// Uses the model numbered `model` or, if `None`, the chain's first model.
///
/// # Errors
///
/// Returns [`EngineError::UnknownChain`] or [`EngineError::UnknownModel`] if
/// the selection does not exist, and [`EngineError::Mapping`] if the range is
/// invalid or contains a position without coordinates.
pub fn ca_slice(
    entry: &Entry,
    chain: char,
    model: Option<i32>,
    start: usize,
    end: usize,
    config: &CorrespondenceConfig,
) -> Result<Vec<Point3<f64>>, EngineError> {
    config.validate()?;
    let chain_id = entry
        .find_chain(chain)
        .ok_or(EngineError::UnknownChain(chain))?;
    let model_id = match model {
        Some(number) => entry.find_model(chain_id, number),
        None => entry.models_of(chain_id).next().map(|(id, _)| id),
    }
    .ok_or(EngineError::UnknownModel {
        chain,
        number: model.unwrap_or(1),
    })?;

    let correspondence = correspond_model(entry, model_id, config)
        .ok_or(EngineError::UnknownModel {
            chain,
            number: model.unwrap_or(1),
        })?;
    let residues = entry
        .model(model_id)
        .map(|m| m.residues())
        .unwrap_or_default();
    Ok(correspondence
        .mapping
        .atom_slice(residues, &config.ca_atom_name, start, end)?)
}
