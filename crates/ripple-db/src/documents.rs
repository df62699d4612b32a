use anyhow::{Result, bail};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Version written into every stored document. Decoding a document with a
/// different version is an error rather than a silent reinterpretation.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Versioned<'a, T> {
    schema: u32,
    #[serde(flatten)]
    doc: &'a T,
}

#[derive(Deserialize)]
struct Stored<T> {
    schema: u32,
    #[serde(flatten)]
    doc: T,
}

/// Serialize a document for storage, stamping the current schema version.
pub fn encode<T: Serialize>(doc: &T) -> Result<String> {
    Ok(serde_json::to_string(&Versioned {
        schema: SCHEMA_VERSION,
        doc,
    })?)
}

/// Parse a stored document, rejecting unknown schema versions.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let stored: Stored<T> = serde_json::from_str(raw)?;
    if stored.schema != SCHEMA_VERSION {
        bail!(
            "unsupported document schema {} (expected {})",
            stored.schema,
            SCHEMA_VERSION
        );
    }
    Ok(stored.doc)
}
