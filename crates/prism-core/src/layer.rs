//! Token Set Loader.
//!
//! Layers arrive either as one JSON file per layer under a tokens directory,
//! or as a single combined document whose top-level keys are layer names.
//! The base application order comes from the `$metadata.tokenSetOrder`
//! manifest when present. Without it the order falls back to a lexical sort:
//! deterministic, but an approximation of designer intent.
//!
//! Layers are immutable once loaded; every build target merges from the same
//! shared store.

use crate::error::LoadError;
use crate::token::{TokenTree, parse_tree};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const METADATA_KEY: &str = "$metadata";
const METADATA_FILE: &str = "$metadata.json";
const SET_ORDER_KEY: &str = "tokenSetOrder";

/// One named layer of token definitions.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub name: String,
    pub tree: TokenTree,
}

/// All loaded layers plus the base application order.
#[derive(Debug, Clone)]
pub struct LayerStore {
    layers: BTreeMap<String, TokenSet>,
    base_order: Vec<String>,
}

impl LayerStore {
    /// Build a store from loaded sets and a declared order. Declared names
    /// with no matching set are dropped; loaded sets the order omits are
    /// appended in lexical order.
    pub fn new(sets: Vec<TokenSet>, declared_order: &[String]) -> Self {
        let layers: BTreeMap<String, TokenSet> =
            sets.into_iter().map(|set| (set.name.clone(), set)).collect();
        let mut base_order: Vec<String> = declared_order
            .iter()
            .filter(|name| layers.contains_key(*name))
            .cloned()
            .collect();
        for name in layers.keys() {
            if !base_order.contains(name) {
                base_order.push(name.clone());
            }
        }
        LayerStore { layers, base_order }
    }

    pub fn base_order(&self) -> &[String] {
        &self.base_order
    }

    pub fn get(&self, name: &str) -> Option<&TokenSet> {
        self.layers.get(name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Load a store from a path: a combined document if it is a file, a layer
/// directory otherwise.
pub fn load(path: impl AsRef<Path>) -> Result<LayerStore, LoadError> {
    let path = path.as_ref();
    if path.is_dir() {
        load_dir(path)
    } else {
        load_combined(path)
    }
}

/// Load a single combined tokens document and split it into per-layer sets.
pub fn load_combined(path: impl AsRef<Path>) -> Result<LayerStore, LoadError> {
    let path = path.as_ref();
    let doc = read_json(path)?;
    split_combined(&doc, &path.display().to_string())
}

/// Split a combined tokens document: every non-`$` top-level object is one
/// layer, `$metadata.tokenSetOrder` is the base order.
pub fn split_combined(doc: &Value, origin: &str) -> Result<LayerStore, LoadError> {
    let Some(members) = doc.as_object() else {
        return Err(LoadError::Parse {
            path: origin.to_string(),
            message: "combined tokens document must be a JSON object".to_string(),
        });
    };

    let mut sets = Vec::new();
    for (name, layer) in members {
        if name.starts_with('$') {
            continue;
        }
        if layer.is_object() {
            sets.push(TokenSet {
                name: name.clone(),
                tree: parse_tree(layer),
            });
        }
    }
    if sets.is_empty() {
        return Err(LoadError::Empty(origin.to_string()));
    }

    let declared = members
        .get(METADATA_KEY)
        .map(set_order_from_metadata)
        .unwrap_or_default();
    Ok(LayerStore::new(sets, &declared))
}

/// Load one layer per `.json` file under a directory tree. The layer name is
/// the file's relative path without the extension (`02 Alias/myQ`). A root
/// `$metadata.json` supplies the base order.
pub fn load_dir(path: impl AsRef<Path>) -> Result<LayerStore, LoadError> {
    let root = path.as_ref();
    let mut files = Vec::new();
    collect_json_files(root, root, &mut files)?;
    files.sort();

    let mut sets = Vec::new();
    for name in &files {
        let tree = read_json(&root.join(format!("{name}.json")))?;
        sets.push(TokenSet {
            name: name.clone(),
            tree: parse_tree(&tree),
        });
    }
    if sets.is_empty() {
        return Err(LoadError::Empty(root.display().to_string()));
    }

    let metadata_path = root.join(METADATA_FILE);
    let declared = if metadata_path.is_file() {
        set_order_from_metadata(&read_json(&metadata_path)?)
    } else {
        Vec::new()
    };
    Ok(LayerStore::new(sets, &declared))
}

fn collect_json_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let entry_path = entry.path();
        let Some(file_name) = entry_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if entry_path.is_dir() {
            if !file_name.starts_with('.') {
                collect_json_files(root, &entry_path, out)?;
            }
            continue;
        }
        if file_name.starts_with('$') || !file_name.ends_with(".json") {
            continue;
        }
        let relative = entry_path
            .strip_prefix(root)
            .unwrap_or(&entry_path)
            .with_extension("");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        out.push(name);
    }
    Ok(())
}

fn set_order_from_metadata(metadata: &Value) -> Vec<String> {
    metadata
        .get(SET_ORDER_KEY)
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| LoadError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
