use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::model::{RankingEntry, RankingTable};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SnapshotFile {
    version: u32,
    #[serde(default)]
    captured_at: Option<String>,
    #[serde(default)]
    tables: Vec<RankingTable>,
}

/// Last known rankings per (category label, format label). Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct RankingSnapshot {
    tables: HashMap<(String, String), Vec<RankingEntry>>,
}

impl RankingSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: impl IntoIterator<Item = RankingTable>) -> Self {
        let mut out = HashMap::new();
        for table in tables {
            if table.rank.is_empty() {
                continue;
            }
            out.insert(snapshot_key(&table.category, table.format.label()), table.rank);
        }
        Self { tables: out }
    }

    /// Missing, unreadable or outdated files all load as an empty snapshot.
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = fs::read_to_string(path) else {
            info!("no rankings snapshot at {}", path.display());
            return Self::empty();
        };
        let file = match serde_json::from_str::<SnapshotFile>(&raw) {
            Ok(file) => file,
            Err(err) => {
                warn!("ignoring unreadable rankings snapshot {}: {err}", path.display());
                return Self::empty();
            }
        };
        if file.version != SNAPSHOT_VERSION {
            warn!(
                "ignoring rankings snapshot {} with version {}",
                path.display(),
                file.version
            );
            return Self::empty();
        }
        Self::from_tables(file.tables)
    }

    pub fn lookup(&self, category: &str, format: &str) -> Option<&[RankingEntry]> {
        self.tables
            .get(&snapshot_key(category, format))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

pub fn save_snapshot(path: &Path, tables: &[RankingTable]) -> Result<usize> {
    let kept = tables
        .iter()
        .filter(|t| !t.rank.is_empty())
        .cloned()
        .collect::<Vec<_>>();
    let count = kept.len();
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        captured_at: Some(Utc::now().to_rfc3339()),
        tables: kept,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&file).context("serialize rankings snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write rankings snapshot")?;
    fs::rename(&tmp, path).context("swap rankings snapshot")?;
    Ok(count)
}

fn snapshot_key(category: &str, format: &str) -> (String, String) {
    (
        category.trim().to_ascii_lowercase(),
        format.trim().to_ascii_lowercase(),
    )
}
