use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::geneset::Signature;

/// Reads a signature from a text file.
///
/// Accepted lines: a bare gene symbol, or `name<TAB>gene`. Blank lines and
/// `#` comments are skipped. With the two-column form every line must name
/// the same signature; `fallback_name` is used for the one-column form.
pub fn load_signature_file(path: &Path, fallback_name: Option<&str>) -> Result<Signature> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read signature file {}", path.display()))?;
    parse_signature_text(&content, &path.display().to_string(), fallback_name)
}

pub fn parse_signature_text(
    content: &str,
    source: &str,
    fallback_name: Option<&str>,
) -> Result<Signature> {
    let mut name: Option<String> = None;
    let mut genes = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        let gene = match parts.as_slice() {
            [gene] => *gene,
            [sig, gene] => {
                if sig.is_empty() {
                    bail!("{}:{} empty signature name", source, line_no);
                }
                match &name {
                    Some(existing) if existing.as_str() != *sig => {
                        bail!(
                            "{}:{} signature '{}' differs from '{}'",
                            source,
                            line_no,
                            sig,
                            existing
                        );
                    }
                    Some(_) => {}
                    None => name = Some(sig.to_string()),
                }
                *gene
            }
            _ => bail!("{}:{} malformed line (expected 1 or 2 columns)", source, line_no),
        };
        if gene.is_empty() {
            bail!("{}:{} empty gene symbol", source, line_no);
        }
        genes.push(gene.to_string());
    }

    if genes.is_empty() {
        bail!("{} contains no genes", source);
    }

    let name = match (name, fallback_name) {
        (_, Some(explicit)) => explicit.to_string(),
        (Some(from_file), None) => from_file,
        (None, None) => bail!("{} does not name its signature; pass --signature", source),
    };

    Ok(Signature::new(name, genes))
}
