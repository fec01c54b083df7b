use crate::core::alphabet::Encoding;
use std::fmt;
use std::io;

/// Errors that can occur during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contains a byte that is not in the alphabet
    InvalidSymbol {
        symbol: u8,
        /// Byte offset of the symbol from the start of the input
        position: u64,
        encoding: Encoding,
    },
}

impl DecodeError {
    pub fn invalid_symbol(symbol: u8, position: u64, encoding: Encoding) -> Self {
        DecodeError::InvalidSymbol {
            symbol,
            position,
            encoding,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            DecodeError::InvalidSymbol {
                symbol,
                position,
                encoding,
            } => {
                let shown = if symbol.is_ascii_graphic() {
                    format!("'{}'", *symbol as char)
                } else {
                    format!("0x{:02X}", symbol)
                };
                if use_color {
                    writeln!(
                        f,
                        "\x1b[1;31merror:\x1b[0m invalid {} symbol {} at byte {}",
                        encoding, shown, position
                    )?;
                } else {
                    writeln!(
                        f,
                        "error: invalid {} symbol {} at byte {}",
                        encoding, shown, position
                    )?;
                }
                writeln!(f)?;

                let valid = String::from_utf8_lossy(encoding.alphabet().symbols());
                let padding = if encoding.is_padded() { " and '='" } else { "" };
                if use_color {
                    write!(f, "\x1b[1;36mhint:\x1b[0m valid symbols: {}{}", valid, padding)
                } else {
                    write!(f, "hint: valid symbols: {}{}", valid, padding)
                }
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors that stop a streaming transcode.
#[derive(Debug)]
pub enum TranscodeError {
    /// Reading input or writing output failed
    Io(io::Error),
    /// The encoded input is malformed
    Decode(DecodeError),
}

impl fmt::Display for TranscodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscodeError::Io(e) => {
                if should_use_color() {
                    write!(f, "\x1b[1;31merror:\x1b[0m {}", e)
                } else {
                    write!(f, "error: {}", e)
                }
            }
            TranscodeError::Decode(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for TranscodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscodeError::Io(e) => Some(e),
            TranscodeError::Decode(e) => Some(e),
        }
    }
}

impl From<io::Error> for TranscodeError {
    fn from(e: io::Error) -> Self {
        TranscodeError::Io(e)
    }
}

impl From<DecodeError> for TranscodeError {
    fn from(e: DecodeError) -> Self {
        TranscodeError::Decode(e)
    }
}

/// Check if colored output should be used
pub(crate) fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}
