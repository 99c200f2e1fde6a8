//! View layout configuration
//!
//! A `LayoutConfig` describes how the byte grid is formatted: item size
//! and format, endianness, grouping, column count, and which decorations
//! are shown. The widget applies changes atomically: an invalid config
//! is rejected wholesale and the previous one stays in effect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address column width for a 64-bit address space, in hex digits.
pub const ADDR_DIGITS_64: usize = 16;

/// Numeric rendering applied to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFormat {
    Hex,
    Octal,
    Decimal,
    SignedDecimal,
    Float,
}

/// Errors produced when validating a [`LayoutConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("item byte length must be 1, 2, 4 or 8 (got {0})")]
    BadItemSize(usize),
    #[error("column count must be positive")]
    ZeroColumns,
    #[error("group size must be positive")]
    ZeroGroupSize,
    #[error("group size {group_size} does not divide column count {columns}")]
    GroupDoesNotDivideColumns { group_size: usize, columns: usize },
    #[error("float format requires an item size of at least 4 bytes (got {0})")]
    FloatTooNarrow(usize),
    #[error("grouping is only available for single-byte hex items")]
    GroupingUnavailable,
}

/// Grid formatting configuration.
///
/// Derived quantities (`item_char_len`, `row_byte_len`) are computed on
/// demand and never stored, so a config value can't go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Bytes per item: 1, 2, 4 or 8.
    pub item_byte_len: usize,
    /// Numeric format for the item pane.
    pub format: ItemFormat,
    /// Byte-order reversal for multi-byte items.
    pub big_endian: bool,
    /// Items per column group. Greater than 1 only in hex-pairs mode.
    pub group_size: usize,
    /// Column groups per row.
    pub columns: usize,
    /// Hex digits shown in the address column.
    pub address_digits: usize,
    /// Prepend "0x" to addresses.
    pub show_address_prefix: bool,
    /// Prepend "0x" to multi-byte hex items.
    pub show_hex_prefix: bool,
    /// Show the parallel printable-character pane.
    pub show_text_pane: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_byte_len: 1,
            format: ItemFormat::Hex,
            big_endian: false,
            group_size: 1,
            columns: 16,
            address_digits: ADDR_DIGITS_64,
            show_address_prefix: true,
            show_hex_prefix: true,
            show_text_pane: true,
        }
    }
}

impl LayoutConfig {
    /// Check the config invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.item_byte_len, 1 | 2 | 4 | 8) {
            return Err(ConfigError::BadItemSize(self.item_byte_len));
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.group_size == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        if self.columns % self.group_size != 0 {
            return Err(ConfigError::GroupDoesNotDivideColumns {
                group_size: self.group_size,
                columns: self.columns,
            });
        }
        if self.format == ItemFormat::Float && self.item_byte_len < 4 {
            return Err(ConfigError::FloatTooNarrow(self.item_byte_len));
        }
        if self.group_size > 1 && !self.pairing_available() {
            return Err(ConfigError::GroupingUnavailable);
        }
        Ok(())
    }

    /// Hex-pairs grouping is only meaningful for single-byte hex items.
    #[inline]
    pub fn pairing_available(&self) -> bool {
        self.item_byte_len == 1 && self.format == ItemFormat::Hex
    }

    /// Bytes represented by one visible row.
    #[inline]
    pub fn row_byte_len(&self) -> usize {
        self.columns * self.group_size * self.item_byte_len
    }

    /// Bytes represented by one column group.
    #[inline]
    pub fn group_byte_len(&self) -> usize {
        self.group_size * self.item_byte_len
    }

    /// Length of the "0x" prefix rendered before multi-byte hex items.
    #[inline]
    pub fn hex_prefix_len(&self) -> usize {
        if self.format == ItemFormat::Hex && self.item_byte_len > 1 && self.show_hex_prefix {
            2
        } else {
            0
        }
    }

    /// Number of characters one rendered item occupies, prefix included.
    ///
    /// These widths match the observed displays: hex is two digits per
    /// byte, octal is ceil(bits / 3), decimals use the widest value of
    /// the type, floats get three display characters per byte.
    pub fn item_char_len(&self) -> usize {
        let digits = match self.format {
            ItemFormat::Hex => 2 * self.item_byte_len,
            ItemFormat::Octal => (self.item_byte_len * 8 + 3) / 3,
            ItemFormat::Decimal => match self.item_byte_len {
                1 => 3,
                2 => 5,
                4 => 10,
                _ => 20,
            },
            ItemFormat::SignedDecimal => match self.item_byte_len {
                1 => 4,
                2 => 6,
                4 => 11,
                _ => 20,
            },
            ItemFormat::Float => 3 * self.item_byte_len,
        };
        digits + self.hex_prefix_len()
    }

    /// Characters in the address column, prefix included.
    #[inline]
    pub fn address_char_len(&self) -> usize {
        self.address_digits + if self.show_address_prefix { 2 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.row_byte_len(), 16);
        assert_eq!(config.item_char_len(), 2);
    }

    #[test]
    fn test_rejects_bad_item_size() {
        let config = LayoutConfig {
            item_byte_len: 3,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadItemSize(3)));
    }

    #[test]
    fn test_rejects_zero_columns() {
        let config = LayoutConfig {
            columns: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroColumns));
    }

    #[test]
    fn test_rejects_narrow_float() {
        let config = LayoutConfig {
            format: ItemFormat::Float,
            item_byte_len: 2,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FloatTooNarrow(2)));
    }

    #[test]
    fn test_rejects_grouping_outside_hex_pairs() {
        let config = LayoutConfig {
            item_byte_len: 2,
            group_size: 2,
            columns: 8,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GroupingUnavailable));
    }

    #[test]
    fn test_hex_pairs_is_valid() {
        let config = LayoutConfig {
            group_size: 2,
            columns: 8,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.row_byte_len(), 16);
    }

    #[test]
    fn test_octal_char_len() {
        for (len, want) in [(1, 3), (2, 6), (4, 11), (8, 22)] {
            let config = LayoutConfig {
                format: ItemFormat::Octal,
                item_byte_len: len,
                ..Default::default()
            };
            assert_eq!(config.item_char_len(), want, "byte len {}", len);
        }
    }

    #[test]
    fn test_hex_prefix_counts_toward_char_len() {
        let mut config = LayoutConfig {
            item_byte_len: 4,
            ..Default::default()
        };
        assert_eq!(config.item_char_len(), 10); // "0x" + 8 digits
        config.show_hex_prefix = false;
        assert_eq!(config.item_char_len(), 8);
    }
}
