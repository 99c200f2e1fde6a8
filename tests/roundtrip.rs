//! Pixel/address round-trip property
//!
//! For every address shown in the window, mapping it to its cell rect
//! and hit-testing any pixel inside that rect must resolve back to the
//! same address, across layouts, fonts, and scroll positions.

use proptest::prelude::*;

use hexpane::{FontMetrics, ItemFormat, LayoutConfig, PaneKind, PaneLayout, Point};

fn arb_config() -> impl Strategy<Value = LayoutConfig> {
    (
        prop_oneof![Just(1usize), Just(2), Just(4), Just(8)],
        0usize..5,
        any::<bool>(),
        1usize..=16,
        any::<bool>(),
    )
        .prop_map(|(len, format_idx, big_endian, columns, paired)| {
            let format = match format_idx {
                0 => ItemFormat::Hex,
                1 => ItemFormat::Octal,
                2 => ItemFormat::Decimal,
                3 => ItemFormat::SignedDecimal,
                _ => ItemFormat::Float,
            };
            // Keep the combination legal: float needs 4+ bytes, pairs
            // need single-byte hex.
            let format = if format == ItemFormat::Float && len < 4 {
                ItemFormat::Hex
            } else {
                format
            };
            let (group_size, columns) = if paired && len == 1 && format == ItemFormat::Hex {
                (2, columns * 2)
            } else {
                (1, columns)
            };
            LayoutConfig {
                item_byte_len: len,
                format,
                big_endian,
                group_size,
                columns,
                ..Default::default()
            }
        })
}

fn arb_metrics() -> impl Strategy<Value = FontMetrics> {
    (8usize..=24, 4usize..=13).prop_map(|(line_height, char_width)| FontMetrics {
        line_height,
        char_width,
    })
}

proptest! {
    #[test]
    fn round_trip_item_pane(
        config in arb_config(),
        metrics in arb_metrics(),
        lines in 1usize..=12,
        start in 0u64..(1 << 40),
        seed in any::<usize>(),
        dx in any::<usize>(),
        dy in any::<usize>(),
    ) {
        prop_assert!(config.validate().is_ok());
        let layout = PaneLayout::compute(&config, metrics, lines * metrics.line_height);

        let items = layout.bytes_per_screen() / config.item_byte_len;
        let offset = (seed % items) * config.item_byte_len;
        let addr = start + offset as u64;

        let rect = layout.address_to_item_rect(addr, start);
        let origin = Point::new(rect.x, rect.y);
        prop_assert_eq!(layout.pixel_to_address(origin, start, PaneKind::Items), addr);

        // Any interior pixel of the cell resolves to the same item.
        let inside = Point::new(rect.x + dx % rect.width, rect.y + dy % rect.height);
        prop_assert_eq!(layout.pixel_to_address(inside, start, PaneKind::Items), addr);
    }

    #[test]
    fn round_trip_text_pane(
        config in arb_config(),
        metrics in arb_metrics(),
        lines in 1usize..=12,
        start in 0u64..(1 << 40),
        seed in any::<usize>(),
    ) {
        let layout = PaneLayout::compute(&config, metrics, lines * metrics.line_height);

        let addr = start + (seed % layout.bytes_per_screen()) as u64;
        let rect = layout.address_to_text_rect(addr, start);
        let origin = Point::new(rect.x, rect.y);
        prop_assert_eq!(layout.pixel_to_address(origin, start, PaneKind::Text), addr);
    }

    #[test]
    fn hit_test_is_total(
        config in arb_config(),
        metrics in arb_metrics(),
        lines in 1usize..=12,
        start in 0u64..(1 << 40),
        x in 0usize..4000,
        y in 0usize..1000,
    ) {
        // Arbitrary pixels, including far outside the panes, resolve to
        // a valid visible address.
        let layout = PaneLayout::compute(&config, metrics, lines * metrics.line_height);
        let end = start + layout.bytes_per_screen() as u64;
        for pane in [PaneKind::Items, PaneKind::Text] {
            let addr = layout.pixel_to_address(Point::new(x, y), start, pane);
            prop_assert!(addr >= start && addr < end);
        }
    }
}
