use std::fmt;

/// The padding symbol appended to a short final group.
pub const PADDING: u8 = b'=';

/// Represents an encoding alphabet: an ordered set of distinct symbols.
///
/// A symbol's position in the alphabet is its numeric value, so the
/// alphabet defines both the value-to-symbol mapping used when encoding
/// and (through [`LookupTable`]) the symbol-to-value mapping used when
/// decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    name: &'static str,
    symbols: &'static [u8],
}

impl Alphabet {
    /// RFC 4648 section 8: `0-9 A-F`.
    pub const BASE16: Alphabet = Alphabet {
        name: "base16",
        symbols: b"0123456789ABCDEF",
    };

    /// RFC 4648 section 6: `A-Z 2-7`.
    pub const BASE32: Alphabet = Alphabet {
        name: "base32",
        symbols: b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
    };

    /// RFC 4648 section 7, the "extended hex" alphabet: `0-9 A-V`.
    pub const BASE32HEX: Alphabet = Alphabet {
        name: "base32hex",
        symbols: b"0123456789ABCDEFGHIJKLMNOPQRSTUV",
    };

    /// RFC 4648 section 4: `A-Z a-z 0-9 + /`.
    pub const BASE64: Alphabet = Alphabet {
        name: "base64",
        symbols: b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
    };

    /// Short lowercase name, e.g. `base32hex`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of symbols (16, 32 or 64).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Returns the symbol for `value`.
    ///
    /// Callers mask `value` to the alphabet's bit width, so it is always in
    /// range.
    #[inline]
    pub fn symbol(&self, value: u8) -> u8 {
        self.symbols[value as usize]
    }

    /// Builds the reverse lookup table for this alphabet.
    pub fn lookup_table(&self) -> LookupTable {
        build_lookup(self)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One of the four RFC 4648 encodings this crate transcodes.
///
/// Each encoding fixes an alphabet and a group geometry: `group_bytes` raw
/// bytes map to exactly `group_symbols` symbols of `bits_per_symbol` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Base16,
    Base32,
    Base32Hex,
    Base64,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::Base16,
        Encoding::Base32,
        Encoding::Base32Hex,
        Encoding::Base64,
    ];

    pub const fn alphabet(self) -> &'static Alphabet {
        match self {
            Encoding::Base16 => &Alphabet::BASE16,
            Encoding::Base32 => &Alphabet::BASE32,
            Encoding::Base32Hex => &Alphabet::BASE32HEX,
            Encoding::Base64 => &Alphabet::BASE64,
        }
    }

    pub const fn bits_per_symbol(self) -> u32 {
        match self {
            Encoding::Base16 => 4,
            Encoding::Base32 | Encoding::Base32Hex => 5,
            Encoding::Base64 => 6,
        }
    }

    /// Raw bytes per group: LCM(bits, 8) / 8.
    pub const fn group_bytes(self) -> usize {
        match self {
            Encoding::Base16 => 1,
            Encoding::Base32 | Encoding::Base32Hex => 5,
            Encoding::Base64 => 3,
        }
    }

    /// Symbols per group: LCM(bits, 8) / bits.
    pub const fn group_symbols(self) -> usize {
        match self {
            Encoding::Base16 => 2,
            Encoding::Base32 | Encoding::Base32Hex => 8,
            Encoding::Base64 => 4,
        }
    }

    /// Base16 groups are a single byte and never need padding.
    pub const fn is_padded(self) -> bool {
        !matches!(self, Encoding::Base16)
    }

    pub fn name(self) -> &'static str {
        self.alphabet().name()
    }

    /// Length of the encoded form of `len` raw bytes.
    pub const fn encoded_len(self, len: usize) -> usize {
        len.div_ceil(self.group_bytes()) * self.group_symbols()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const INVALID: u8 = 0xFF;

/// Reverse lookup table mapping every byte to its value in one alphabet.
///
/// Bytes outside the alphabet are recorded as invalid rather than as zero,
/// so strict decoding can tell them apart from the alphabet's first symbol.
#[derive(Clone)]
pub struct LookupTable {
    values: [u8; 256],
}

impl LookupTable {
    /// Value of `byte`, or `None` if it is not a symbol of the alphabet.
    #[inline]
    pub fn get(&self, byte: u8) -> Option<u8> {
        match self.values[byte as usize] {
            INVALID => None,
            value => Some(value),
        }
    }

    /// Value of `byte`, with non-symbols read as zero.
    #[inline]
    pub fn get_or_zero(&self, byte: u8) -> u8 {
        self.get(byte).unwrap_or(0)
    }
}

impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid = self.values.iter().filter(|&&v| v != INVALID).count();
        f.debug_struct("LookupTable").field("valid", &valid).finish()
    }
}

/// Builds the byte-to-value table for `alphabet`. Never fails.
pub fn build_lookup(alphabet: &Alphabet) -> LookupTable {
    let mut values = [INVALID; 256];
    for (value, &symbol) in alphabet.symbols().iter().enumerate() {
        values[symbol as usize] = value as u8;
    }
    LookupTable { values }
}
