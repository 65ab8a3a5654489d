use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use thiserror::Error;
use tomlfix_types::{Match, MatchLedger, schema};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LoadedLedger {
    pub path: Utf8PathBuf,
    /// Directory name the ledger was found in (best effort).
    pub source: String,
    pub ledger: Result<MatchLedger, LedgerLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum LedgerLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

/// Load a single ledger file. Read and parse failures are captured, not returned.
pub fn load_ledger(path: &Utf8Path) -> LoadedLedger {
    let source = path
        .parent()
        .and_then(|p| p.file_name())
        .unwrap_or("unknown")
        .to_string();

    let ledger = match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str::<MatchLedger>(&s).map_err(|e| LedgerLoadError::Json {
            message: e.to_string(),
        }),
        Err(e) => Err(LedgerLoadError::Io {
            message: e.to_string(),
        }),
    };

    match &ledger {
        Ok(l) if l.schema != schema::TOMLFIX_MATCHES_V1 => {
            warn!(path = %path, schema = %l.schema, "unexpected ledger schema; reading anyway");
        }
        Ok(l) => debug!(path = %path, matches = l.matches.len(), "loaded ledger"),
        Err(e) => warn!(path = %path, error = %e, "failed to load ledger"),
    }

    LoadedLedger {
        path: path.to_path_buf(),
        source,
        ledger,
    }
}

/// Load every `*/matches.json` under `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn load_ledgers(dir: &Utf8Path) -> anyhow::Result<Vec<LoadedLedger>> {
    let pattern = dir.join("*/matches.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning for match ledgers");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob */matches.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();
        out.push(load_ledger(&Utf8PathBuf::from(path)));
    }

    // Deterministic order matters: it is the ledger order matches tie-break on.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Every match from the ledgers that loaded, in ledger order.
pub fn collect_matches(loaded: &[LoadedLedger]) -> Vec<Match> {
    loaded
        .iter()
        .filter_map(|l| l.ledger.as_ref().ok())
        .flat_map(|l| l.matches.iter().cloned())
        .collect()
}
