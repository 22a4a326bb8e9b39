use super::chain::Chain;
use super::ids::{ChainId, ModelId};
use super::model::Model;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A complete structure entry: its chains, their canonical sequences, missing
/// residue lists and per-model observed residues.
///
/// The entry exclusively owns all chains and models through slot-map arenas.
/// Chains reference their models by [`ModelId`] and models point back to their
/// chain by [`ChainId`], so no component owns its parent. Once produced by
/// [`EntryBuilder`](super::builder::EntryBuilder), an entry is immutable.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    /// The four-character identifier of the entry (e.g. "1ABC").
    pub id_code: String,
    /// The path the entry was read from, if any.
    pub path: Option<PathBuf>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Primary storage for models of every chain.
    models: SlotMap<ModelId, Model>,
    /// Chains in the order they were first encountered.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_ident_map: HashMap<char, ChainId>,
}

impl Entry {
    pub(crate) fn new(id_code: &str, path: Option<PathBuf>) -> Self {
        Self {
            id_code: id_code.to_string(),
            path,
            ..Default::default()
        }
    }

    /// Adds a chain or returns the existing one with the same identifier.
    pub(crate) fn add_chain(&mut self, ident: char) -> ChainId {
        *self.chain_ident_map.entry(ident).or_insert_with(|| {
            let id = self.chains.insert(Chain::new(ident));
            self.chain_order.push(id);
            id
        })
    }

    pub(crate) fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.chains.get_mut(id)
    }

    /// Registers a new model under a chain, returning `None` if the chain does not exist.
    pub(crate) fn add_model(&mut self, chain_id: ChainId, model: Model) -> Option<ModelId> {
        if !self.chains.contains_key(chain_id) {
            return None;
        }
        let model_id = self.models.insert(model);
        self.chains[chain_id].models.push(model_id);
        Some(model_id)
    }

    /// Retrieves a chain by its handle.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Retrieves a model by its handle.
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Resolves the chain owning a model.
    pub fn chain_of(&self, model_id: ModelId) -> Option<&Chain> {
        self.models
            .get(model_id)
            .and_then(|model| self.chains.get(model.chain_id))
    }

    /// Finds a chain handle by its single-character identifier.
    pub fn find_chain(&self, ident: char) -> Option<ChainId> {
        self.chain_ident_map.get(&ident).copied()
    }

    /// Iterates over chains in encounter order.
    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    pub fn chain_count(&self) -> usize {
        self.chain_order.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Iterates over the models of a chain in encounter order.
    pub fn models_of(&self, chain_id: ChainId) -> impl Iterator<Item = (ModelId, &Model)> {
        self.chains
            .get(chain_id)
            .map(|chain| chain.models.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.models.get(id).map(|model| (id, model)))
    }

    /// Finds a chain's model by its serial number.
    pub fn find_model(&self, chain_id: ChainId, number: i32) -> Option<ModelId> {
        self.models_of(chain_id)
            .find(|(_, model)| model.number == number)
            .map(|(id, _)| id)
    }

    /// Returns the only chain of the entry, or `None` if there are zero or several.
    pub fn one_chain(&self) -> Option<ChainId> {
        match self.chain_order.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Derives an id code from a file name following the common archive layouts:
    /// `pdbXXXX.ent` style names yield `XXXX`, SCOP-style names (`d1abca_.ent`)
    /// yield the four characters after the first.
    pub(crate) fn id_code_from_path(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        if name.len() >= 7 && name.starts_with("pdb") {
            return name.get(3..7).map(str::to_string);
        }
        if name.len() >= 6 {
            return name.get(1..5).map(str::to_string);
        }
        None
    }
}
