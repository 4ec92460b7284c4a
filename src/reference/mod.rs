//! Reference tables shared by every request: gene universe, cohort universe,
//! phenotype and survival data restricted to one consistent sample registry.
//!
//! A `Reference` is immutable after `load` and is shared behind an `Arc`.

mod cache;
mod tables;

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::config::DataConfig;
use crate::error::Result;
use crate::survival::SurvivalRecord;

pub use cache::ReferenceCache;
pub use tables::{
    GeneMapTable, PhenotypeTable, SurvivalTable, read_gene_map, read_phenotype, read_survival,
};

#[derive(Debug)]
pub struct Reference {
    pub data: DataConfig,
    /// Gene symbols selectable for a signature.
    pub genes: Vec<String>,
    /// Cohort identifiers in first-appearance order.
    pub cohorts: Vec<String>,
    /// Sample registry: samples with both phenotype and survival, phenotype order.
    pub samples: Vec<String>,
    gene_map: HashMap<String, String>,
    cohort_of: HashMap<String, String>,
    survival: HashMap<String, SurvivalRecord>,
    pub warnings: Vec<String>,
}

impl Reference {
    pub fn load(data: &DataConfig) -> Result<Self> {
        let delimiter = data.delimiter_byte();
        let gene_map = read_gene_map(
            &data.gene_map_path(),
            delimiter,
            &data.gene_id_column,
            &data.gene_symbol_column,
        )?;
        let phenotype = read_phenotype(
            &data.phenotype_path(),
            delimiter,
            &data.sample_column,
            &data.cohort_column,
        )?;
        let survival = read_survival(
            &data.survival_path(),
            delimiter,
            &data.sample_column,
            &data.event_column,
            &data.time_column,
        )?;

        let reference = Self::from_tables(data.clone(), gene_map, phenotype, survival);
        info!(
            genes = reference.genes.len(),
            cohorts = reference.cohorts.len(),
            samples = reference.samples.len(),
            "reference_loaded"
        );
        Ok(reference)
    }

    pub fn from_tables(
        data: DataConfig,
        gene_map: GeneMapTable,
        phenotype: PhenotypeTable,
        survival: SurvivalTable,
    ) -> Self {
        let mut warnings = Vec::new();
        if gene_map.duplicate_ids > 0 {
            warnings.push(format!(
                "gene map: {} duplicate ids ignored (kept first)",
                gene_map.duplicate_ids
            ));
        }
        if phenotype.duplicate_samples > 0 {
            warnings.push(format!(
                "phenotype: {} duplicate samples ignored (kept first)",
                phenotype.duplicate_samples
            ));
        }
        if phenotype.missing_cohort > 0 {
            warnings.push(format!(
                "phenotype: {} samples without cohort skipped",
                phenotype.missing_cohort
            ));
        }
        if survival.skipped > 0 {
            warnings.push(format!(
                "survival: {} rows with missing or invalid time/event skipped",
                survival.skipped
            ));
        }
        if survival.duplicate_samples > 0 {
            warnings.push(format!(
                "survival: {} duplicate samples ignored (kept first)",
                survival.duplicate_samples
            ));
        }

        let mut cohorts = Vec::new();
        let mut cohort_seen = HashSet::new();
        for (_, cohort) in &phenotype.rows {
            if cohort_seen.insert(cohort.clone()) {
                cohorts.push(cohort.clone());
            }
        }

        let mut samples = Vec::new();
        let mut cohort_of = HashMap::new();
        let mut registry_survival = HashMap::new();
        let mut without_survival = 0usize;
        for (sample, cohort) in phenotype.rows {
            match survival.records.get(&sample) {
                Some(record) => {
                    registry_survival.insert(sample.clone(), *record);
                    cohort_of.insert(sample.clone(), cohort);
                    samples.push(sample);
                }
                None => without_survival += 1,
            }
        }
        let without_phenotype = survival.records.len() - registry_survival.len();
        if without_survival > 0 || without_phenotype > 0 {
            warn!(
                without_survival,
                without_phenotype,
                registry = samples.len(),
                "samples outside the registry dropped"
            );
            warnings.push(format!(
                "sample registry: {} phenotype samples lack survival, \
                 {} survival samples lack phenotype",
                without_survival, without_phenotype
            ));
        }

        Self {
            data,
            genes: gene_map.symbols,
            cohorts,
            samples,
            gene_map: gene_map.id_to_symbol,
            cohort_of,
            survival: registry_survival,
            warnings,
        }
    }

    pub fn has_cohort(&self, cohort: &str) -> bool {
        self.cohorts.iter().any(|c| c == cohort)
    }

    pub fn cohort_of(&self, sample: &str) -> Option<&str> {
        self.cohort_of.get(sample).map(String::as_str)
    }

    pub fn survival_of(&self, sample: &str) -> Option<SurvivalRecord> {
        self.survival.get(sample).copied()
    }

    pub fn in_registry(&self, sample: &str) -> bool {
        self.cohort_of.contains_key(sample)
    }

    /// Symbol for a raw expression row id; ids absent from the map pass
    /// through unchanged.
    pub fn symbol_for<'a>(&'a self, raw_id: &'a str) -> (&'a str, bool) {
        match self.gene_map.get(raw_id) {
            Some(symbol) => (symbol.as_str(), true),
            None => (raw_id, false),
        }
    }

    pub fn samples_in_cohort<'a>(&'a self, cohort: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.samples
            .iter()
            .filter(move |s| self.cohort_of.get(s.as_str()).map(String::as_str) == Some(cohort))
            .map(String::as_str)
    }
}
