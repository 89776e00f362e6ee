//! Structure sources: remote fetch by identifier and local files.
//!
//! The engine owns parsing; this module only resolves *where* the bytes
//! come from and *how* they are framed. Format follows the file
//! extension (`.cif`/`.bcif` are mmCIF, everything else legacy PDB), and
//! binary payloads are handed over exactly as read, with no re-encoding.

use std::path::Path;

use crate::error::ParseError;

/// Wire format of a structure file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    /// Columnar mmCIF (text) or BinaryCIF.
    MmCif,
    /// Legacy fixed-column PDB.
    Pdb,
}

/// Structure file contents with their framing preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructurePayload {
    /// UTF-8 text, as decoded from the file.
    Text(String),
    /// Raw bytes, passed through untouched (BinaryCIF).
    Binary(Vec<u8>),
}

/// A structure file ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureData {
    /// Parse format for the engine.
    pub format: StructureFormat,
    /// File contents.
    pub payload: StructurePayload,
    /// Display label (uppercased id, or file name).
    pub label: String,
}

/// Determine format and framing from a file name.
///
/// Returns `(format, is_binary)`. Matching is case-insensitive.
#[must_use]
pub fn detect_format(file_name: &str) -> (StructureFormat, bool) {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".bcif") {
        (StructureFormat::MmCif, true)
    } else if lower.ends_with(".cif") {
        (StructureFormat::MmCif, false)
    } else {
        (StructureFormat::Pdb, false)
    }
}

/// Read a local structure file, preserving text/binary framing.
pub fn read_file(path: &Path) -> Result<StructureData, ParseError> {
    let bytes = std::fs::read(path)?;
    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), ToOwned::to_owned);
    let (format, is_binary) = detect_format(&label);

    let payload = if is_binary {
        StructurePayload::Binary(bytes)
    } else {
        let text = String::from_utf8(bytes)
            .map_err(|e| ParseError::Encoding(e.to_string()))?;
        StructurePayload::Text(text)
    };

    Ok(StructureData { format, payload, label })
}

/// Build the RCSB download URL for a structure identifier.
///
/// Identifiers are 4 alphanumeric characters, matched case-insensitively
/// (the URL uses the lowercase form).
pub fn rcsb_url(id: &str) -> Result<String, ParseError> {
    if id.len() != 4 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::BadIdentifier(id.to_owned()));
    }
    Ok(format!(
        "https://files.rcsb.org/download/{}.pdb",
        id.to_lowercase()
    ))
}

/// Fetch a structure from RCSB by identifier.
pub fn fetch(id: &str) -> Result<StructureData, ParseError> {
    let url = rcsb_url(id)?;
    log::info!("downloading {} from RCSB", id.to_uppercase());

    let content = ureq::get(&url)
        .call()
        .map_err(|e| ParseError::Fetch(format!("{id}: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| ParseError::Fetch(format!("{id}: {e}")))?;

    Ok(StructureData {
        format: StructureFormat::Pdb,
        payload: StructurePayload::Text(content),
        label: id.to_uppercase(),
    })
}
