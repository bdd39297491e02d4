//! Port range tokens.
//!
//! A token is either a single port (`"80"`) or an inclusive range
//! (`"8000-8100"`). Parsing does not require `start <= end`; an inverted
//! range is syntactically valid and simply contains no ports.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Error type for range token parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("expected \"N\" or \"N1-N2\", got {0:?}")]
    InvalidFormat(String),
    #[error("invalid port number: {0:?}")]
    InvalidNumber(String),
}

/// Largest TCP port number.
pub const MAX_PORT: u16 = u16::MAX;

/// An inclusive range parsed from a single token.
///
/// Bounds are kept as parsed, so `"65533-70000"` is a valid range. Only
/// the part inside the TCP port domain is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: i64,
    end: i64,
}

impl PortRange {
    /// Create a range. `start > end` is allowed and yields no ports.
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Create a range containing a single port.
    pub const fn single(port: i64) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// The part of the range inside `0..=65535`, if any.
    fn port_bounds(&self) -> Option<(u16, u16)> {
        let lo = u16::try_from(self.start.max(0)).ok()?;
        let hi = u16::try_from(self.end.min(i64::from(MAX_PORT))).ok()?;
        (lo <= hi).then_some((lo, hi))
    }

    /// Whether part of the range lies outside `0..=65535`.
    pub(crate) fn exceeds_port_domain(&self) -> bool {
        self.start <= self.end && (self.start < 0 || self.end > i64::from(MAX_PORT))
    }
}

impl IntoIterator for PortRange {
    type Item = u16;
    type IntoIter = std::iter::Flatten<std::option::IntoIter<RangeInclusive<u16>>>;

    /// Ports in ascending order, clamped to the TCP port domain.
    fn into_iter(self) -> Self::IntoIter {
        self.port_bounds()
            .map(|(lo, hi)| lo..=hi)
            .into_iter()
            .flatten()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bounds: Vec<&str> = s.split('-').collect();
        let parse = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| PortError::InvalidNumber(part.to_string()))
        };

        match bounds[..] {
            [port] => Ok(Self::single(parse(port)?)),
            [start, end] => Ok(Self::new(parse(start)?, parse(end)?)),
            _ => Err(PortError::InvalidFormat(s.to_string())),
        }
    }
}
