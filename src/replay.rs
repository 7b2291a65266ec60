//! Replay a script of entity actions over a JSON collection.
//!
//! A script is JSON lines: one [`EntityAction`] per line. Blank lines and
//! lines starting with `#` are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::entity::{EntityAction, EntityReducer, EntityState};
use crate::store::Store;

pub type JsonAction = EntityAction<String, Value, Map<String, Value>>;
pub type JsonState = EntityState<String, Value>;
pub type JsonReducer = EntityReducer<String, Value, Map<String, Value>>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid action on line {line} of '{path}': {source}")]
    ParseError {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid snapshot '{path}': {source}")]
    SnapshotError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What one dispatched action did to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub kind: &'static str,
    /// The store produced a new snapshot.
    pub changed: bool,
    /// The `ids` sequence was replaced.
    pub ids_changed: bool,
    pub total: usize,
}

fn read(path: &Path) -> Result<String, ReplayError> {
    fs::read_to_string(path).map_err(|e| ReplayError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse script text. `path` is only used in error messages.
pub fn parse_script(path: &Path, content: &str) -> Result<Vec<JsonAction>, ReplayError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| ReplayError::ParseError {
                path: path.to_path_buf(),
                line: index + 1,
                source: e,
            })
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<JsonAction>, ReplayError> {
    let content = read(path)?;
    parse_script(path, &content)
}

/// Load a serialized `{ids, entities}` snapshot.
pub fn load_snapshot(path: &Path) -> Result<JsonState, ReplayError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| ReplayError::SnapshotError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Dispatch each action in order and report what it changed.
pub fn run(store: &Store<JsonReducer>, actions: Vec<JsonAction>) -> Vec<StepOutcome> {
    actions
        .into_iter()
        .enumerate()
        .map(|(step, action)| {
            let before = store.state();
            let kind = action.kind();
            let changed = store.dispatch(action);
            let after = store.state();

            let outcome = StepOutcome {
                kind,
                changed,
                ids_changed: !after.ids_ptr_eq(&before),
                total: after.len(),
            };
            tracing::info!(
                step,
                kind,
                changed,
                ids_changed = outcome.ids_changed,
                total = outcome.total,
                "Replayed action"
            );
            outcome
        })
        .collect()
}
