use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use svdsync_fetch::{FetchError, Fetcher, HttpClient};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CATALOG_URL: &str = "https://www.st.com/content/st_com/en/products/microcontrollers-microprocessors/stm32-32-bit-arm-cortex-mcus.cxst-rs-grid.html/CL1734.cad_models_and_symbols.svd.json";
pub const DEFAULT_ORIGIN: &str = "https://www.st.com";

/// A microcontroller family as listed by the catalog.
///
/// Ordering is by `(name, version, source)`, which fixes the processing order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Family {
    /// Display name, casing as published.
    pub name: String,
    pub version: String,
    /// Absolute archive location.
    pub source: String,
}

impl Family {
    pub fn new(name: impl Into<String>, version: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: source.into(),
        }
    }

    /// Name used on disk.
    pub fn dir_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog row {row} has an empty description")]
    MissingName { row: usize },
}

#[derive(Deserialize)]
struct CatalogDocument {
    rows: Vec<CatalogRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow {
    localized_descriptions: Localized,
    version: String,
    localized_links: Localized,
}

#[derive(Deserialize)]
struct Localized {
    en: String,
}

/// Parse a catalog document into families sorted by `(name, version)`.
///
/// Invalid UTF-8 in the body is dropped before parsing. Relative links are
/// resolved by prefixing `origin`. When two rows map to the same directory
/// name only the last one in sorted order is kept.
pub fn parse_catalog(body: &[u8], origin: &str) -> Result<Vec<Family>, CatalogError> {
    let text = svdsync_archive::decode_lenient(body);
    let document: CatalogDocument = serde_json::from_str(&text)?;

    let mut families = document
        .rows
        .into_iter()
        .enumerate()
        .map(|(row, entry)| {
            let name = entry
                .localized_descriptions
                .en
                .split_whitespace()
                .next()
                .ok_or(CatalogError::MissingName { row })?
                .to_string();
            Ok(Family {
                name,
                version: entry.version,
                source: format!("{origin}{}", entry.localized_links.en),
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    families.sort();
    Ok(dedupe(families))
}

fn dedupe(families: Vec<Family>) -> Vec<Family> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Family> = Vec::with_capacity(families.len());

    for family in families {
        match positions.get(&family.dir_name()) {
            Some(&pos) => {
                warn!(
                    dropped = %unique[pos],
                    kept = %family,
                    "catalog lists the same family twice"
                );
                unique[pos] = family;
            }
            None => {
                positions.insert(family.dir_name(), unique.len());
                unique.push(family);
            }
        }
    }

    unique.sort();
    unique
}

/// Download and parse the catalog.
pub async fn resolve<C: HttpClient>(fetcher: &Fetcher<C>, url: &str, origin: &str) -> Result<Vec<Family>, CatalogError> {
    let body = fetcher.fetch_bytes(url).await?;
    let families = parse_catalog(&body, origin)?;
    for family in &families {
        info!(family = %family.name, version = %family.version, url = %family.source, "resolved");
    }
    Ok(families)
}
