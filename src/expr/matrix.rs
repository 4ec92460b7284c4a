use std::collections::HashMap;

/// Genes × samples expression for one request. Storage is sample-major so
/// each sample's profile is one contiguous slice for the scorer.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    genes: Vec<String>,
    samples: Vec<String>,
    values: Vec<f32>,
    gene_index: HashMap<String, usize>,
}

impl ExpressionMatrix {
    /// `values[col * genes.len() + row]`.
    pub fn from_sample_major(
        genes: Vec<String>,
        samples: Vec<String>,
        values: Vec<f32>,
    ) -> anyhow::Result<Self> {
        if values.len() != genes.len() * samples.len() {
            anyhow::bail!(
                "expression buffer has {} values, expected {} genes x {} samples",
                values.len(),
                genes.len(),
                samples.len()
            );
        }
        let mut gene_index = HashMap::with_capacity(genes.len());
        for (row, gene) in genes.iter().enumerate() {
            if gene_index.insert(gene.clone(), row).is_some() {
                anyhow::bail!("duplicate gene '{}' in expression matrix", gene);
            }
        }
        Ok(Self {
            genes,
            samples,
            values,
            gene_index,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn gene_index(&self) -> &HashMap<String, usize> {
        &self.gene_index
    }

    pub fn sample_profile(&self, col: usize) -> &[f32] {
        let n = self.genes.len();
        &self.values[col * n..(col + 1) * n]
    }

    pub fn value(&self, gene: &str, sample: usize) -> Option<f32> {
        let row = *self.gene_index.get(gene)?;
        Some(self.values[sample * self.genes.len() + row])
    }
}
