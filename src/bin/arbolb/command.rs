use std::num::ParseIntError;

use thiserror::Error;

pub(crate) const USAGE: &str = "\
Usage: arbolb <command> [argument]
Commands:
  init <min_degree>   create an empty B-tree with the given minimum degree
  insert <value>      insert a value
  search <value>      look a value up
  delete <value>      delete a value
  traverse            list every value in ascending order
  print               show the tree level by level";

/// One invocation of the front end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Init(usize),
    Insert(i64),
    Search(i64),
    Delete(i64),
    Traverse,
    Print,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub(crate) enum CommandError {
    #[error("command `{0}` requires an argument")]
    MissingArgument(&'static str),

    #[error("`{value}` is not a valid argument for `{command}`: {source}")]
    BadArgument {
        command: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("unknown command `{0}`")]
    Unknown(String),
}

impl Command {
    /// Parses the positional arguments (program name already stripped).
    /// `Ok(None)` means no command was given.
    pub(crate) fn parse<S: AsRef<str>>(args: &[S]) -> Result<Option<Self>, CommandError> {
        let Some(name) = args.first().map(AsRef::as_ref) else {
            return Ok(None);
        };
        let argument = args.get(1).map(AsRef::as_ref);

        let command = match name {
            "init" => Command::Init(parse_argument("init", argument)?),
            "insert" => Command::Insert(parse_argument("insert", argument)?),
            "search" => Command::Search(parse_argument("search", argument)?),
            "delete" => Command::Delete(parse_argument("delete", argument)?),
            "traverse" => Command::Traverse,
            "print" => Command::Print,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn parse_argument<T>(command: &'static str, argument: Option<&str>) -> Result<T, CommandError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    let value = argument.ok_or(CommandError::MissingArgument(command))?;
    value.trim().parse().map_err(|source| CommandError::BadArgument {
        command,
        value: value.to_owned(),
        source,
    })
}
