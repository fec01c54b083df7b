use clap::{ArgAction, Parser};
use rfc4648_codec::{Direction, Encoding};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Mode:
  E  Encode
  D  Decode

Base:
  A  Base16
  B  Base32 (with --extended-hex: Base32hex)
  C  Base64

Settings are read from ~/.config/rfc4648/config.toml and ./rfc4648.toml.";

#[derive(Parser, Debug)]
#[command(name = "rfc4648")]
#[command(version)]
#[command(about = "Encode or decode a file as RFC 4648 Base16, Base32 or Base64", long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// E to encode, D to decode
    #[arg(value_name = "MODE", value_parser = parse_mode)]
    pub mode: Direction,

    /// A (Base16), B (Base32) or C (Base64)
    #[arg(value_name = "BASE", value_parser = parse_base)]
    pub base: Encoding,

    /// File to read
    #[arg(value_name = "IN_FILE")]
    pub input: PathBuf,

    /// File to create or truncate
    #[arg(value_name = "OUT_FILE")]
    pub output: PathBuf,

    /// Use the extended hex alphabet for Base32
    #[arg(short = 'x', long)]
    pub extended_hex: bool,

    /// Read symbols outside the alphabet as zero instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Additional settings file, applied last
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The encoding selected by BASE and `--extended-hex`.
    pub fn encoding(&self) -> Result<Encoding, &'static str> {
        match (self.base, self.extended_hex) {
            (Encoding::Base32, true) => Ok(Encoding::Base32Hex),
            (encoding, false) => Ok(encoding),
            (_, true) => Err("--extended-hex only applies to Base32 (B)"),
        }
    }
}

fn single_letter(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

fn parse_mode(value: &str) -> Result<Direction, String> {
    match single_letter(value) {
        Some('E') => Ok(Direction::Encode),
        Some('D') => Ok(Direction::Decode),
        _ => Err(format!("expected E or D, got '{}'", value)),
    }
}

fn parse_base(value: &str) -> Result<Encoding, String> {
    match single_letter(value) {
        Some('A') => Ok(Encoding::Base16),
        Some('B') => Ok(Encoding::Base32),
        Some('C') => Ok(Encoding::Base64),
        _ => Err(format!("expected A, B or C, got '{}'", value)),
    }
}
