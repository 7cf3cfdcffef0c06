// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for the TSP domain.
//!
//! This module turns whitespace-delimited text streams into a validated
//! `CostMatrix`. The expected format is an `n × n` integer matrix with no
//! explicit dimension header: `n` is inferred from the number of tokens on
//! the first data line, and `n` rows of `n` costs follow (the first row
//! included).
//!
//! Lines may contain comments introduced by `#`, which are ignored during
//! tokenization. All structural validation (squareness, non-negativity,
//! accumulator capacity) is delegated to `CostMatrixBuilder`, so a loaded
//! matrix carries the same guarantees as a programmatically built one.

use crate::{
    index::CityIndex,
    matrix::{CostMatrix, CostMatrixBuilder, CostMatrixError},
};
use num_traits::{FromPrimitive, PrimInt, Signed};
use waypoint_core::num::ops::checked_arithmetic::CheckedMulVal;
use std::{
    fmt::{Debug, Display},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum InstanceLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before `n * n` costs were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The instance dimensions are invalid (no data, or more cities than the
    /// configured limit).
    InvalidDimensions,
    /// The parsed costs do not form a valid matrix.
    Matrix(CostMatrixError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for InstanceLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "Instance dimensions are invalid")
            }
            Self::Matrix(e) => write!(f, "Matrix error: {}", e),
        }
    }
}

impl std::error::Error for InstanceLoaderError {}

impl From<std::io::Error> for InstanceLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for InstanceLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<CostMatrixError> for InstanceLoaderError {
    fn from(e: CostMatrixError) -> Self {
        Self::Matrix(e)
    }
}

/// A configurable loader for TSP cost matrix instances.
///
/// The format this parser expects is as follows (whitespace-separated tokens,
/// `#` starts a comment):
///
/// ```raw
/// c_0_0 c_0_1 ... c_0_{n-1}    (first row; its token count defines n)
/// ...
/// c_{n-1}_0 ... c_{n-1}_{n-1}
/// ```
///
/// # Configuration
/// * `max_cities`: Reject instances larger than this, before reading the
///   whole matrix. Exact solvers choke on large `n` anyway, and the limit
///   guards against feeding an arbitrary large file into the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader<T> {
    max_cities: Option<usize>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for InstanceLoader<T> {
    fn default() -> Self {
        Self {
            max_cities: None,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> InstanceLoader<T>
where
    T: PrimInt + Signed + FromPrimitive + FromStr + Display + Debug + CheckedMulVal,
{
    /// Creates a new `InstanceLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects instances with more than `limit` cities.
    #[inline]
    pub fn max_cities(mut self, limit: usize) -> Self {
        self.max_cities = Some(limit);
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<CostMatrix<T>, InstanceLoaderError> {
        let mut sc = Scanner::new(rdr);

        // The first data line fixes the dimension.
        let first_row = sc
            .line_tokens()?
            .ok_or(InstanceLoaderError::UnexpectedEof)?;
        let n = first_row.len();

        if n == 0 {
            return Err(InstanceLoaderError::InvalidDimensions);
        }
        if self.max_cities.is_some_and(|limit| n > limit) {
            return Err(InstanceLoaderError::InvalidDimensions);
        }

        let mut builder = CostMatrixBuilder::new(n);

        for (j, token) in first_row.iter().enumerate() {
            let cost = parse_token::<T>(token)?;
            builder.set_cost(CityIndex::new(0), CityIndex::new(j), cost);
        }

        for i in 1..n {
            for j in 0..n {
                let cost = sc.next::<T>()?;
                builder.set_cost(CityIndex::new(i), CityIndex::new(j), cost);
            }
        }

        Ok(builder.build()?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<CostMatrix<T>, InstanceLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<CostMatrix<T>, InstanceLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<CostMatrix<T>, InstanceLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, InstanceLoaderError> {
    token.parse::<T>().map_err(|_| {
        InstanceLoaderError::Parse(ParseTokenError {
            token: token.to_owned(),
            type_name: std::any::type_name::<T>(),
        })
    })
}

/// A helper to read whitespace-delimited tokens from a generic reader.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    /// Creates a new `Scanner` wrapping the given reader.
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the internal line buffer. Returns `Ok(true)` if data read, `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, InstanceLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self
            .rdr
            .read_line(&mut self.buf)
            .map_err(InstanceLoaderError::Io)?;
        Ok(n > 0)
    }

    /// Returns the tokens of the next line that contains any, skipping blank
    /// lines and comments, or `None` at EOF.
    fn line_tokens(&mut self) -> Result<Option<Vec<String>>, InstanceLoaderError> {
        loop {
            if !self.fill_line()? {
                return Ok(None);
            }

            let data = match self.buf.split_once('#') {
                Some((before, _)) => before,
                None => self.buf.as_str(),
            };

            let tokens: Vec<String> = data.split_whitespace().map(str::to_owned).collect();
            // The whole line was consumed either way.
            self.pos = self.buf.len();
            if !tokens.is_empty() {
                return Ok(Some(tokens));
            }
        }
    }

    /// Reads the next token and parses it into `T`.
    /// Automatically skips whitespace and comments starting with '#'.
    fn next<T>(&mut self) -> Result<T, InstanceLoaderError>
    where
        T: FromStr,
    {
        loop {
            // Refill buffer if empty or consumed
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(InstanceLoaderError::UnexpectedEof);
            }

            // Skip whitespace and comments
            while self.pos < self.buf.len() {
                let remainder = &self.buf[self.pos..];

                // Found a comment? Skip to end of line immediately.
                if remainder.starts_with('#') {
                    self.pos = self.buf.len();
                    break;
                }

                let c = remainder.chars().next().unwrap();
                if !c.is_whitespace() {
                    break; // Found start of a token
                }

                self.pos += c.len_utf8();
            }

            // If we consumed the whole line (whitespace/comments), loop to get next line
            if self.pos >= self.buf.len() {
                continue;
            }

            // Find end of token
            let mut end = self.pos;
            while end < self.buf.len() {
                let remainder = &self.buf[end..];

                // Token ends at whitespace or start of a comment
                if remainder.starts_with('#') {
                    break;
                }

                let c = remainder.chars().next().unwrap();
                if c.is_whitespace() {
                    break;
                }
                end += c.len_utf8();
            }

            let token = &self.buf[self.pos..end];
            self.pos = end;

            if token.is_empty() {
                continue;
            }

            return parse_token(token);
        }
    }
}
