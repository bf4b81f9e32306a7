//! Command-line front end for `arbolb`.
//!
//! Each invocation runs one command. Apart from `init`, every command rebuilds the tree
//! by replaying the stored record, applies the command and, for mutations, writes the
//! record and the tree-shape document back. The reply goes to stdout as one JSON object.

mod command;
mod logger;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use arbolb::BTree;
use log::{debug, error};
use serde::Serialize;
use thiserror::Error;

use command::{Command, CommandError, USAGE};
use store::{Record, Store, StoreError};

/// Environment variable naming the directory holding the record and shape files.
const DATA_DIR_ENV: &str = "ARBOLB_DATA_DIR";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tree(#[from] arbolb::Error),

    #[error("failed to encode reply: {0}")]
    Reply(#[from] serde_json::Error),
}

/// The JSON object printed for every successful command.
#[derive(Debug, Default, PartialEq, Serialize)]
struct Reply {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traverse: Option<Vec<i64>>,
}

impl Reply {
    fn message(message: String) -> Self {
        Self {
            message,
            ..Self::default()
        }
    }
}

/// What a command produced: a JSON reply or a plain-text rendering.
#[derive(Debug, PartialEq)]
enum Output {
    Reply(Reply),
    Text(String),
}

/// Loads the record and replays it into a fresh tree.
fn rebuild(store: &Store) -> Result<(Record, BTree<i64>), CliError> {
    let record = store.load()?;
    let tree = record.replay()?;
    Ok((record, tree))
}

fn execute(store: &Store, command: Command) -> Result<Output, CliError> {
    let reply = match command {
        Command::Init(min_degree) => {
            let record = Record::new(min_degree);
            let tree = record.replay()?;
            store.save(&record, &tree)?;
            Reply::message(format!("B-tree initialised with minimum degree {}", tree.min_degree()))
        }
        Command::Insert(value) => {
            let (mut record, mut tree) = rebuild(store)?;
            let message = if tree.insert(value) {
                record.push(value);
                store.save(&record, &tree)?;
                format!("Inserted: {value}")
            } else {
                format!("Already present: {value}")
            };
            Reply::message(message)
        }
        Command::Search(value) => {
            let (_, tree) = rebuild(store)?;
            let found = tree.contains(&value);
            let message = if found {
                format!("Found: {value}")
            } else {
                format!("Not found: {value}")
            };
            Reply {
                found: Some(found),
                ..Reply::message(message)
            }
        }
        Command::Delete(value) => {
            let (mut record, mut tree) = rebuild(store)?;
            let (found, message) = match tree.try_remove(&value) {
                Ok(()) => {
                    record.forget(value);
                    store.save(&record, &tree)?;
                    (true, format!("Deleted: {value}"))
                }
                Err(arbolb::Error::EmptyTree) => (false, format!("Tree is empty, nothing to delete: {value}")),
                Err(_) => (false, format!("Not found: {value}")),
            };
            Reply {
                found: Some(found),
                ..Reply::message(message)
            }
        }
        Command::Traverse => {
            let (_, tree) = rebuild(store)?;
            Reply {
                traverse: Some(tree.to_sorted_vec()),
                ..Reply::message("In-order traversal complete".to_owned())
            }
        }
        Command::Print => {
            let (_, tree) = rebuild(store)?;
            return Ok(Output::Text(tree.to_string()));
        }
    };
    Ok(Output::Reply(reply))
}

fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV).map_or_else(|| PathBuf::from("."), PathBuf::from)
}

fn run(args: &[String]) -> Result<Option<Output>, CliError> {
    let Some(command) = Command::parse(args)? else {
        return Ok(None);
    };
    debug!("running {command:?}");
    execute(&Store::new(data_dir()), command).map(Some)
}

fn main() -> ExitCode {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(None) => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Some(Output::Text(text))) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Ok(Some(Output::Reply(reply))) => match serde_json::to_string(&reply) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", CliError::from(e));
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            debug!("command failed: {e:?}");
            eprint!("{}", failure_report(&e));
            ExitCode::FAILURE
        }
    }
}

/// The stderr text for a failed command; parse errors append the usage text.
fn failure_report(e: &CliError) -> String {
    let mut report = format!("Error: {e}\n");
    if matches!(e, CliError::Command(_)) {
        report.push_str(USAGE);
        report.push('\n');
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reply(store: &Store, command: Command) -> Reply {
        match execute(store, command).unwrap() {
            Output::Reply(reply) => reply,
            Output::Text(text) => panic!("expected a reply, got text {text:?}"),
        }
    }

    #[test]
    fn commands_before_init_fail() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(matches!(
            execute(&store, Command::Search(1)),
            Err(CliError::Store(StoreError::Uninitialised))
        ));
        assert!(matches!(
            execute(&store, Command::Init(1)),
            Err(CliError::Tree(arbolb::Error::InvalidMinDegree(1)))
        ));
    }

    #[test]
    fn session_replays_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        assert_eq!(
            reply(&store, Command::Init(2)).message,
            "B-tree initialised with minimum degree 2"
        );
        for value in [10, 20, 5, 6, 12, 30, 7, 17] {
            assert_eq!(reply(&store, Command::Insert(value)).message, format!("Inserted: {value}"));
        }
        assert_eq!(reply(&store, Command::Insert(12)).message, "Already present: 12");

        let found = reply(&store, Command::Search(12));
        assert_eq!(found.found, Some(true));

        let deleted = reply(&store, Command::Delete(6));
        assert_eq!(deleted.found, Some(true));
        let missing = reply(&store, Command::Delete(13));
        assert_eq!(missing.found, Some(false));
        assert_eq!(missing.message, "Not found: 13");

        let traversal = reply(&store, Command::Traverse);
        assert_eq!(traversal.traverse, Some(vec![5, 7, 10, 12, 17, 20, 30]));
        assert_eq!(store.load().unwrap().keys, vec![10, 20, 5, 12, 30, 7, 17]);

        let Output::Text(text) = execute(&store, Command::Print).unwrap() else {
            panic!("print should render text");
        };
        assert!(text.starts_with('|'));
    }

    #[test]
    fn delete_on_fresh_tree_reports_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        reply(&store, Command::Init(3));

        let deleted = reply(&store, Command::Delete(4));
        assert_eq!(deleted.found, Some(false));
        assert_eq!(deleted.message, "Tree is empty, nothing to delete: 4");
        assert_eq!(store.load().unwrap(), Record::new(3));
    }

    #[test]
    fn failure_is_reported_once() {
        let unknown = CliError::from(Command::parse(&["frob"]).unwrap_err());
        let report = failure_report(&unknown);
        assert_eq!(report.matches("unknown command `frob`").count(), 1);
        assert!(report.starts_with("Error: unknown command `frob`\n"));
        assert!(report.ends_with(&format!("{USAGE}\n")));

        let report = failure_report(&CliError::Store(StoreError::Uninitialised));
        assert_eq!(report, format!("Error: {}\n", StoreError::Uninitialised));
    }

    #[test]
    fn reply_omits_unset_fields() {
        let json = serde_json::to_string(&Reply::message("ok".into())).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }
}
