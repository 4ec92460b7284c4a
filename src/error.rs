use thiserror::Error;

pub type Result<T> = std::result::Result<T, SigvivalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SigvivalError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("reference data unavailable ({source_name}): {message}")]
    DataUnavailable { source_name: String, message: String },

    #[error("cohort '{cohort}' not found: {message}")]
    CohortNotFound { cohort: String, message: String },

    #[error("none of the {requested} genes of signature '{signature}' are present in the expression matrix")]
    GeneNotFound { signature: String, requested: usize },

    #[error("signature '{signature}' matched {found} genes, at least {min_size} required")]
    InsufficientSignatureCoverage {
        signature: String,
        found: usize,
        min_size: usize,
    },

    #[error("{valid} samples with valid scores, {required} needed for {groups} groups; choose fewer groups or more cohorts")]
    InsufficientSamples {
        valid: usize,
        required: usize,
        groups: usize,
    },

    #[error("group '{group}' has {size} samples, at least {min_size} required; choose fewer groups or more cohorts")]
    InsufficientGroupSize {
        group: String,
        size: usize,
        min_size: usize,
    },

    #[error("proportional hazards fit did not converge: {message}")]
    RegressionDidNotConverge { message: String },

    #[error("failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("computation cancelled")]
    Cancelled,
}

impl SigvivalError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn data_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn cohort_not_found(cohort: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CohortNotFound {
            cohort: cohort.into(),
            message: message.into(),
        }
    }

    pub fn not_converged(message: impl Into<String>) -> Self {
        Self::RegressionDidNotConverge {
            message: message.into(),
        }
    }

    pub fn write_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used in reports and CLI exit output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "InvalidRequest",
            Self::DataUnavailable { .. } => "DataUnavailable",
            Self::CohortNotFound { .. } => "CohortNotFound",
            Self::GeneNotFound { .. } => "GeneNotFound",
            Self::InsufficientSignatureCoverage { .. } => "InsufficientSignatureCoverage",
            Self::InsufficientSamples { .. } => "InsufficientSamples",
            Self::InsufficientGroupSize { .. } => "InsufficientGroupSize",
            Self::RegressionDidNotConverge { .. } => "RegressionDidNotConverge",
            Self::WriteError { .. } => "WriteError",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Recovers the domain error kind from an `anyhow` chain, if any.
pub fn kind_of(err: &anyhow::Error) -> Option<&SigvivalError> {
    err.chain().find_map(|e| e.downcast_ref::<SigvivalError>())
}
