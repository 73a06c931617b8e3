//! String conversions for request parameters.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("expected '<ip>:<port>', got '{0}'")]
    MissingPort(String),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// An `ip:port` pair as it appears in a query parameter, e.g. `127.0.0.1:8080`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpPort {
    pub ip: String,
    pub port: u16,
}

impl IpPort {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self { ip: ip.into(), port }
    }
}

impl FromStr for IpPort {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, port) = s
            .rsplit_once(':')
            .filter(|(ip, _)| !ip.is_empty())
            .ok_or_else(|| ConversionError::MissingPort(s.to_string()))?;

        let port = port
            .parse::<u16>()
            .map_err(|_| ConversionError::InvalidPort(port.to_string()))?;

        Ok(IpPort::new(ip, port))
    }
}

impl fmt::Display for IpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Formats a number with `,` thousands separators: `1000` -> `"1,000"`.
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Inverse of [`format_grouped`]. Separators are optional.
pub fn parse_grouped(s: &str) -> Result<i64, ConversionError> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<i64>()
        .map_err(|_| ConversionError::InvalidNumber(s.to_string()))
}
