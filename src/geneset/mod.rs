mod loader;
mod resolve;

use serde::{Deserialize, Serialize};

pub use loader::{load_signature_file, parse_signature_text};
pub use resolve::{ResolvedSignature, resolve_signature};

use crate::request::dedup_preserving_order;

/// A user-named gene list. Gene identifiers are unique; order is kept only
/// for stable reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub genes: Vec<String>,
}

impl Signature {
    pub fn new(name: impl Into<String>, genes: Vec<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            genes: dedup_preserving_order(genes),
        }
    }
}
