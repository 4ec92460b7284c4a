use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigvivalError};
use crate::geneset::Signature;
use crate::strata::CutPoint;

/// One analysis request. Built once by the caller and passed by value
/// through the pipeline; no stage reads form state from anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub signature: Signature,
    pub cohorts: Vec<String>,
    pub cut_point: CutPoint,
}

impl AnalysisRequest {
    pub fn new(
        signature_name: impl Into<String>,
        genes: Vec<String>,
        cohorts: Vec<String>,
        cut_point: CutPoint,
    ) -> Result<Self> {
        let request = Self {
            signature: Signature::new(signature_name, genes),
            cohorts: dedup_preserving_order(cohorts),
            cut_point,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.signature.name.trim().is_empty() {
            return Err(SigvivalError::invalid_request("signature name is empty"));
        }
        if self.signature.genes.is_empty() {
            return Err(SigvivalError::invalid_request(format!(
                "signature '{}' has no genes",
                self.signature.name
            )));
        }
        if self.signature.genes.iter().any(|g| g.trim().is_empty()) {
            return Err(SigvivalError::invalid_request("gene list contains an empty identifier"));
        }
        if self.cohorts.is_empty() {
            return Err(SigvivalError::invalid_request("no cohorts selected"));
        }
        if self.cohorts.iter().any(|c| c.trim().is_empty()) {
            return Err(SigvivalError::invalid_request("cohort list contains an empty identifier"));
        }
        Ok(())
    }
}

pub(crate) fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
