use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use arbolb::{BTree, NodeShape};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

pub(crate) const RECORD_FILE: &str = "btree_data.csv";
pub(crate) const SHAPE_FILE: &str = "btree_data.json";

/// The persisted state: the degree plus every live key in insertion order.
///
/// Written as a single line `<t>,<k1>;<k2>;...`. This is the only authoritative state;
/// the tree itself is rebuilt from it on every run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Record {
    pub(crate) min_degree: usize,
    pub(crate) keys: Vec<i64>,
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("failed to encode tree shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tree not initialised, run `init <min_degree>` first")]
    Uninitialised,
}

impl Record {
    pub(crate) fn new(min_degree: usize) -> Self {
        Self {
            min_degree,
            keys: Vec::new(),
        }
    }

    /// Rebuilds the tree by replaying every recorded insertion in order.
    pub(crate) fn replay(&self) -> arbolb::Result<BTree<i64>> {
        BTree::from_keys(self.min_degree, self.keys.iter().copied())
    }

    /// Records a successful insertion.
    pub(crate) fn push(&mut self, key: i64) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Forgets `key`; returns whether it was recorded.
    pub(crate) fn forget(&mut self, key: i64) -> bool {
        match self.keys.iter().position(|&k| k == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }
}

impl FromStr for Record {
    type Err = StoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split(',');
        let (Some(degree), Some(keys), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(StoreError::Malformed(format!("expected `<t>,<keys>`, got `{line}`")));
        };

        let min_degree = degree
            .trim()
            .parse()
            .map_err(|e| StoreError::Malformed(format!("bad minimum degree `{degree}`: {e}")))?;
        let keys = keys
            .split(';')
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                key.trim()
                    .parse()
                    .map_err(|e| StoreError::Malformed(format!("bad key `{key}`: {e}")))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { min_degree, keys })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.min_degree)?;
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// Shape document layout: `{"tree": null}` or `{"tree": {...}}`.
#[derive(Serialize)]
struct ShapeDocument<'a> {
    tree: Option<&'a NodeShape<i64>>,
}

/// The record file and shape document inside one directory.
pub(crate) struct Store {
    dir: PathBuf,
}

impl Store {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn record_path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE)
    }

    pub(crate) fn shape_path(&self) -> PathBuf {
        self.dir.join(SHAPE_FILE)
    }

    /// Loads the record. A missing or blank file, or a degree below 2, means `init` never ran.
    pub(crate) fn load(&self) -> Result<Record, StoreError> {
        let path = self.record_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::Uninitialised),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let line = text.lines().next().unwrap_or_default();
        if line.trim().is_empty() {
            return Err(StoreError::Uninitialised);
        }
        let record: Record = line.parse()?;
        if record.min_degree < arbolb::MinDegree::MIN.get() {
            return Err(StoreError::Uninitialised);
        }
        debug!("loaded {} keys from {}", record.keys.len(), path.display());
        Ok(record)
    }

    pub(crate) fn save(&self, record: &Record, tree: &BTree<i64>) -> Result<(), StoreError> {
        write(&self.record_path(), format!("{record}\n").as_bytes())?;

        let shape = tree.shape();
        let document = ShapeDocument { tree: shape.as_ref() };
        write(&self.shape_path(), &serde_json::to_vec_pretty(&document)?)?;

        info!("saved {} keys to {}", record.keys.len(), self.dir.display());
        Ok(())
    }
}

fn write(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    fs::write(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_line_round_trip() {
        let record = Record {
            min_degree: 3,
            keys: vec![10, -4, 7],
        };
        assert_eq!(record.to_string(), "3,10;-4;7");
        assert_eq!("3,10;-4;7\n".parse::<Record>().unwrap(), record);
        assert_eq!(Record::new(2).to_string(), "2,");
        assert_eq!("2,".parse::<Record>().unwrap(), Record::new(2));
    }

    #[test]
    fn empty_key_fields_are_skipped() {
        let record: Record = "2,;5;;6;".parse().unwrap();
        assert_eq!(record.keys, vec![5, 6]);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for line in ["", "3", "3,1,2", "x,1", "3,1;y"] {
            assert!(
                matches!(line.parse::<Record>(), Err(StoreError::Malformed(_))),
                "`{line}` should be malformed"
            );
        }
    }

    #[test]
    fn push_and_forget_keep_insertion_order() {
        let mut record = Record::new(2);
        for key in [5, 1, 5, 9] {
            record.push(key);
        }
        assert_eq!(record.keys, vec![5, 1, 9]);
        assert!(record.forget(1));
        assert!(!record.forget(1));
        assert_eq!(record.keys, vec![5, 9]);
    }

    #[test]
    fn missing_or_zero_degree_record_is_uninitialised() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Uninitialised)));

        fs::write(store.record_path(), "0,\n").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Uninitialised)));
    }

    #[test]
    fn blank_record_is_uninitialised_but_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        for blank in ["", "\n", "   \r\n"] {
            fs::write(store.record_path(), blank).unwrap();
            assert!(matches!(store.load(), Err(StoreError::Uninitialised)), "{blank:?}");
        }

        fs::write(store.record_path(), "three,1;2\n").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn unreadable_record_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::create_dir(store.record_path()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        let message = err.to_string();
        assert!(message.starts_with("I/O error on "), "{message}");
        assert!(message.contains(RECORD_FILE), "{message}");
    }

    #[test]
    fn save_then_load_rebuilds_same_tree() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let mut record = Record::new(2);
        let mut tree = record.replay().unwrap();
        for key in [10, 20, 5, 6, 12, 30, 7, 17] {
            assert!(tree.insert(key));
            record.push(key);
        }
        store.save(&record, &tree).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, record);
        let rebuilt = loaded.replay().unwrap();
        assert_eq!(rebuilt.to_sorted_vec(), tree.to_sorted_vec());
        assert_eq!(rebuilt.shape(), tree.shape());

        let document: serde_json::Value =
            serde_json::from_slice(&fs::read(store.shape_path()).unwrap()).unwrap();
        let root = &document["tree"];
        assert_eq!(root["leaf"], serde_json::Value::Bool(false));
        assert!(root["children"].is_array());
    }

    #[test]
    fn empty_tree_document_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let record = Record::new(4);
        store.save(&record, &record.replay().unwrap()).unwrap();

        let text = fs::read_to_string(store.shape_path()).unwrap();
        assert_eq!(text.split_whitespace().collect::<String>(), r#"{"tree":null}"#);
    }
}
