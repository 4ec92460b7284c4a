use std::collections::{HashMap, HashSet};

use crate::geneset::Signature;

#[derive(Debug, Clone)]
pub struct ResolvedSignature {
    pub name: String,
    pub gene_ids: Vec<usize>,
    pub missing: Vec<String>,
    pub total: usize,
}

impl ResolvedSignature {
    pub fn found(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.gene_ids.len() as f64 / self.total as f64
        }
    }
}

/// Maps signature symbols onto matrix rows. Symbols absent from the matrix
/// are reported in `missing`; row ids come back sorted and unique.
pub fn resolve_signature(
    signature: &Signature,
    gene_index: &HashMap<String, usize>,
) -> ResolvedSignature {
    let mut gene_ids = Vec::new();
    let mut missing = Vec::new();
    let mut seen = HashSet::new();

    for symbol in &signature.genes {
        if let Some(&gid) = gene_index.get(symbol) {
            if seen.insert(gid) {
                gene_ids.push(gid);
            }
        } else {
            missing.push(symbol.clone());
        }
    }

    gene_ids.sort_unstable();

    ResolvedSignature {
        name: signature.name.clone(),
        gene_ids,
        missing,
        total: signature.genes.len(),
    }
}
