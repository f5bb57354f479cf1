//! Painting list parsing.
//!
//! The input is a numbered plain-text list, one painting per line:
//!
//! ```text
//! 1: Wounded Eurydice, Jean Baptiste Camille Corot, Art Institute of Chicago
//! 2: Olympia, Édouard Manet
//! ```
//!
//! Anything after the second comma (usually the location) is ignored.

use crate::{GessoError, GessoResult};
use gesso_types::NonEmptyText;
use std::path::Path;

/// One entry of the painting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Painting {
    pub number: u32,
    pub title: NonEmptyText,
    pub artist: NonEmptyText,
}

/// Splits `<digits>:<rest>` into its number and the trimmed rest.
fn split_numbered(line: &str) -> Option<(u32, &str)> {
    let digits = line.find(|c: char| !c.is_ascii_digit())?;
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(':')?.trim();
    if rest.is_empty() {
        return None;
    }
    let number = line[..digits].parse().ok()?;
    Some((number, rest))
}

fn parse_line(line: &str) -> Option<Painting> {
    let Some((number, rest)) = split_numbered(line) else {
        tracing::warn!("could not parse line: {}", line);
        return None;
    };

    let parts: Vec<&str> = rest.splitn(3, ',').map(str::trim).collect();
    if parts.len() < 2 {
        tracing::warn!("invalid format (need title, artist): {}", line);
        return None;
    }

    match (NonEmptyText::new(parts[0]), NonEmptyText::new(parts[1])) {
        (Ok(title), Ok(artist)) => Some(Painting {
            number,
            title,
            artist,
        }),
        _ => {
            tracing::warn!("empty title or artist: {}", line);
            None
        }
    }
}

/// Parses the painting list.
///
/// Blank lines are skipped silently; malformed lines are logged and skipped.
pub fn parse_input(content: &str) -> Vec<Painting> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect()
}

/// Reads and parses a painting list file.
///
/// # Errors
///
/// Returns `GessoError::InputRead` if the file cannot be read.
pub fn parse_input_file(path: &Path) -> GessoResult<Vec<Painting>> {
    let content = std::fs::read_to_string(path).map_err(GessoError::InputRead)?;
    Ok(parse_input(&content))
}
