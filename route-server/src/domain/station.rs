//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {code:?}: {reason}")]
pub struct InvalidStationCode {
    code: String,
    reason: &'static str,
}

impl InvalidStationCode {
    fn new(code: &str, reason: &'static str) -> Self {
        Self {
            code: code.to_string(),
            reason,
        }
    }

    /// The rejected input.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// A two-letter line identifier, e.g. `NS`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId([u8; 2]);

impl LineId {
    /// Returns the line identifier as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.as_str())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station code: a line identifier followed by a sequence number.
///
/// Codes are unique across the whole network. The sequence number orders
/// stations along their line; gaps are allowed.
///
/// # Examples
///
/// ```
/// use route_server::domain::StationCode;
///
/// let code = StationCode::parse("NS12").unwrap();
/// assert_eq!(code.line().as_str(), "NS");
/// assert_eq!(code.sequence(), 12);
/// assert_eq!(code.as_str(), "NS12");
///
/// assert!(StationCode::parse("N12").is_err());
/// assert!(StationCode::parse("NS").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationCode {
    text: String,
    line: LineId,
    sequence: u32,
}

impl StationCode {
    /// Parse a station code of the form `<2 letters><integer>`.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() < 3 {
            return Err(InvalidStationCode::new(
                s,
                "expected two letters followed by a number",
            ));
        }

        if !bytes[0].is_ascii_alphabetic() || !bytes[1].is_ascii_alphabetic() {
            return Err(InvalidStationCode::new(
                s,
                "line identifier must be two ASCII letters",
            ));
        }

        let digits = &s[2..];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationCode::new(
                s,
                "sequence must be a decimal number",
            ));
        }

        let sequence = digits
            .parse::<u32>()
            .map_err(|_| InvalidStationCode::new(s, "sequence number out of range"))?;

        Ok(Self {
            text: s.to_string(),
            line: LineId([bytes[0], bytes[1]]),
            sequence,
        })
    }

    /// The line this station belongs to.
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Position of the station along its line.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the code exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.text)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
