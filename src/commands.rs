// src/commands.rs
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

use crate::export::ExportFormat;

/// A column given either by position or by header name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

/// One row, or every dirty row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    All,
}

/// A single user event read from the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Show,
    Edit {
        row: usize,
        col: ColumnRef,
        value: String,
    },
    Save(Target),
    Revert(Target),
    Invalid,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  upload <path>              extract a statement PDF
  show                       print the table (* dirty row, ! invalid cell)
  edit <row> <col> <value>   set a cell; <col> is an index or header name
  save <row>|all             commit edits
  revert <row>|all           restore the last committed values
  invalid                    list cells failing their column rule
  export csv|xlsx [path]     write the current table
  help                       this text
  quit";

/// Split off the first whitespace-delimited word.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (input, ""),
    })
}

fn parse_row(word: &str) -> Result<usize> {
    word.parse()
        .map_err(|_| anyhow!("row must be a number, got {:?}", word))
}

fn parse_target(rest: &str) -> Result<Target> {
    match next_word(rest) {
        Some((w, _)) if w.eq_ignore_ascii_case("all") => Ok(Target::All),
        Some((w, _)) => Ok(Target::Row(parse_row(w)?)),
        None => bail!("expected a row number or `all`"),
    }
}

/// Parse one input line. Blank lines are an error the shell ignores.
pub fn parse(line: &str) -> Result<Command> {
    let (verb, rest) = next_word(line).ok_or_else(|| anyhow!("empty command"))?;
    match verb.to_lowercase().as_str() {
        "upload" | "open" => {
            let path = rest.trim();
            if path.is_empty() {
                bail!("select a file first: upload <path>");
            }
            Ok(Command::Upload(PathBuf::from(path)))
        }
        "show" | "ls" => Ok(Command::Show),
        "edit" => {
            let (row, rest) = next_word(rest).ok_or_else(|| anyhow!("usage: edit <row> <col> <value>"))?;
            let (col, rest) = next_word(rest).ok_or_else(|| anyhow!("usage: edit <row> <col> <value>"))?;
            let col = match col.parse::<usize>() {
                Ok(idx) => ColumnRef::Index(idx),
                Err(_) => ColumnRef::Name(col.to_string()),
            };
            Ok(Command::Edit {
                row: parse_row(row)?,
                col,
                value: rest.trim().to_string(),
            })
        }
        "save" | "commit" => Ok(Command::Save(parse_target(rest)?)),
        "revert" => Ok(Command::Revert(parse_target(rest)?)),
        "invalid" => Ok(Command::Invalid),
        "export" => {
            let (fmt, rest) = next_word(rest).ok_or_else(|| anyhow!("usage: export csv|xlsx [path]"))?;
            let format: ExportFormat = fmt.parse()?;
            let path = Some(rest.trim())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
            Ok(Command::Export { format, path })
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => bail!("unknown command {:?} (try `help`)", other),
    }
}
