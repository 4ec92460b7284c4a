use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::geneset::resolve_signature;
use crate::pipeline::Stage;

pub struct Stage3Signature;

impl Stage3Signature {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Signature {
    fn name(&self) -> &'static str {
        "stage3_signature"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let matrix = ctx.matrix.as_ref().context("expression matrix missing")?;
        let resolved = resolve_signature(&ctx.request.signature, matrix.gene_index());

        if !resolved.missing.is_empty() && resolved.found() > 0 {
            let preview: Vec<&str> = resolved.missing.iter().take(10).map(String::as_str).collect();
            let more = resolved.missing.len().saturating_sub(preview.len());
            let mut message = format!(
                "signature '{}': {} of {} genes not in the expression matrix: {}",
                resolved.name,
                resolved.missing.len(),
                resolved.total,
                preview.join(", ")
            );
            if more > 0 {
                message.push_str(&format!(" (+{} more)", more));
            }
            ctx.warn(message);
        }

        info!(
            signature = %resolved.name,
            found = resolved.found(),
            total = resolved.total,
            coverage = resolved.coverage(),
            "signature_resolved"
        );
        ctx.signature = Some(resolved);
        Ok(())
    }
}
