use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("point ({x}, {y}) is outside the set's bounds")]
    OutOfBounds { x: f64, y: f64 },

    #[error("invalid rectangle [{xmin}, {xmax}] x [{ymin}, {ymax}]")]
    InvalidRect { xmin: f64, ymin: f64, xmax: f64, ymax: f64 },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
