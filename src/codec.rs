//! Item codec: byte runs to typed values to fixed-width display text
//!
//! Pure functions, independent of the cache and geometry. Decoding
//! respects the configured endianness and signedness; rendering pads to
//! the exact character width reported by `LayoutConfig::item_char_len`
//! so every grid cell lines up.

use crate::config::{ItemFormat, LayoutConfig};

/// A decoded item value with its numeric interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaggedValue {
    U64(u64),
    I64(i64),
    F64(f64),
}

impl TaggedValue {
    /// Unsigned view of the value (bit-preserving for integers).
    #[inline]
    pub fn as_u64(self) -> u64 {
        match self {
            TaggedValue::U64(v) => v,
            TaggedValue::I64(v) => v as u64,
            TaggedValue::F64(v) => v as u64,
        }
    }

    /// Signed view of the value.
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            TaggedValue::U64(v) => v as i64,
            TaggedValue::I64(v) => v,
            TaggedValue::F64(v) => v as i64,
        }
    }

    /// Floating-point view of the value.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            TaggedValue::U64(v) => v as f64,
            TaggedValue::I64(v) => v as f64,
            TaggedValue::F64(v) => v,
        }
    }
}

/// Semantic class of a byte, used for per-byte coloring in both panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// 0x00
    Zero,
    /// 0x7F
    Cap7f,
    /// 0xFF
    CapFf,
    /// Printable ASCII (0x20..=0x7E)
    Printable,
    Other,
}

/// Printable ASCII range shown verbatim in the text pane.
#[inline]
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// Classify a byte for display coloring.
pub fn byte_class(byte: u8) -> ByteClass {
    match byte {
        0x00 => ByteClass::Zero,
        0x7f => ByteClass::Cap7f,
        0xff => ByteClass::CapFf,
        b if is_printable(b) => ByteClass::Printable,
        _ => ByteClass::Other,
    }
}

/// Reinterpret a byte run as a typed value.
///
/// `bytes` must hold exactly `config.item_byte_len` bytes. Multi-byte
/// runs are byte-reversed when `big_endian` is set; signed decimal
/// reinterprets the top bit; float reinterprets the IEEE-754 bit
/// pattern (single for 4 bytes, double for 8).
pub fn decode(bytes: &[u8], config: &LayoutConfig) -> TaggedValue {
    debug_assert_eq!(bytes.len(), config.item_byte_len);

    // Normalize to little-endian and widen; the high bytes stay zero.
    let mut raw = [0u8; 8];
    raw[..bytes.len()].copy_from_slice(bytes);
    if config.big_endian {
        raw[..bytes.len()].reverse();
    }
    let unsigned = u64::from_le_bytes(raw);

    match config.format {
        ItemFormat::Float => {
            if config.item_byte_len == 4 {
                TaggedValue::F64(f32::from_bits(unsigned as u32) as f64)
            } else {
                TaggedValue::F64(f64::from_bits(unsigned))
            }
        }
        ItemFormat::SignedDecimal => {
            let shift = 64 - 8 * config.item_byte_len as u32;
            TaggedValue::I64(((unsigned << shift) as i64) >> shift)
        }
        _ => TaggedValue::U64(unsigned),
    }
}

/// Render a decoded value at the fixed width of the current config.
///
/// Hex and octal are zero-padded, decimals and floats right-aligned
/// with spaces. Values wider than the field are not truncated.
pub fn render(value: TaggedValue, config: &LayoutConfig) -> String {
    let width = config.item_char_len() - config.hex_prefix_len();
    match config.format {
        ItemFormat::Hex => {
            let digits = format!("{:0width$x}", value.as_u64(), width = width);
            if config.hex_prefix_len() > 0 {
                format!("0x{}", digits)
            } else {
                digits
            }
        }
        ItemFormat::Octal => format!("{:0width$o}", value.as_u64(), width = width),
        ItemFormat::Decimal => format!("{:width$}", value.as_u64(), width = width),
        ItemFormat::SignedDecimal => format!("{:width$}", value.as_i64(), width = width),
        ItemFormat::Float => format!("{:width$}", value.as_f64(), width = width),
    }
}

/// Character shown for a byte in the text pane.
#[inline]
pub fn text_glyph(byte: u8) -> char {
    if is_printable(byte) {
        byte as char
    } else {
        '.'
    }
}

/// Render an address for the address column.
pub fn render_address(addr: u64, config: &LayoutConfig) -> String {
    let digits = format!("{:0width$x}", addr, width = config.address_digits);
    if config.show_address_prefix {
        format!("0x{}", digits)
    } else {
        digits
    }
}
