use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::error;

use crate::coordinate::{GameCoordinate, TeamCoordinate};
use crate::error::{BracketError, BracketResult, ParseError};

/// Whether a template line carries no game (blank or `#` comment).
pub fn is_ignored(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one template line of the form `[R,Rd,I]vs[R,Rd,I]`.
///
/// The line is split on `[`, `]` and the literal token `vs`; empty pieces are
/// dropped. Exactly two pieces must remain, the first is home and the second
/// away.
pub fn parse_line(line: &str) -> Result<GameCoordinate, ParseError> {
    let tokens: Vec<&str> = line
        .trim()
        .split(|c: char| c == '[' || c == ']')
        .flat_map(|piece| piece.split("vs"))
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() != 2 {
        return Err(ParseError::TokenCount {
            line: line.to_string(),
            found: tokens.len(),
        });
    }

    let coordinate = |text: &str| {
        text.parse::<TeamCoordinate>().map_err(|e| ParseError::Line {
            line: line.to_string(),
            source: Box::new(e),
        })
    };

    Ok(GameCoordinate::new(coordinate(tokens[0])?, coordinate(tokens[1])?))
}

/// Parse a whole template in file order, stopping at the first malformed line.
///
/// Games feeding a later game must appear before it; this is not checked here.
pub fn parse_template<I, S>(lines: I) -> BracketResult<Vec<GameCoordinate>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut games = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if is_ignored(line) {
            continue;
        }
        let game = parse_line(line).map_err(|source| {
            error!("Cannot process tournament template line {}: {}", i + 1, source);
            BracketError::Template {
                line_number: i + 1,
                source,
            }
        })?;
        games.push(game);
    }
    Ok(games)
}

/// Read and parse a template file.
pub fn load_template(path: impl AsRef<Path>) -> BracketResult<Vec<GameCoordinate>> {
    let path = path.as_ref();
    let io_error = |source| BracketError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;

    parse_template(lines)
}
