use tracing::debug;

use crate::{Error, Point2D, Result};

/// Parse a coordinate list: one point per line, written as two whitespace separated numbers `x y`.
/// Blank lines are skipped.  Line numbers in errors start at 1.
/// Coordinates are not checked against any bounds here, that happens when the points are inserted.
pub fn parse_points(text: &str) -> Result<Vec<Point2D>> {
    text.lines().enumerate()
        .filter(|(_, l)|!l.trim().is_empty())
        .map(|(i, l)|parse_line(i + 1, l))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Point2D> {
    let fail = |reason: String|{
        debug!(line, %reason, "rejected coordinate line");
        Error::Parse{line, reason}
    };
    let mut tokens = text.split_whitespace();
    let (Some(x), Some(y), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(fail(format!("expected 2 coordinates, found {}", text.split_whitespace().count())))
    };
    let coord = |t: &str|t.parse::<f64>().map_err(|e|fail(format!("bad coordinate {:?}: {}", t, e)));
    Ok(Point2D::new(coord(x)?, coord(y)?))
}
