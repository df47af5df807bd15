//! Property tests for fractal rendering and lab layouts.
//!
//! These tests use `proptest` to generate random root sizes, seeds, and lab
//! configs and verify that surface and tree invariants hold for each.

use proptest::prelude::*;
use sketchlab_engine::prelude::*;

/// Root sizes that paint something, kept small enough for fast cases.
fn drawable_root() -> impl Strategy<Value = f64> {
    (401u32..25_000u32).prop_map(|v| f64::from(v) * 0.01)
}

fn lab_config_strategy() -> impl Strategy<Value = LabConfig> {
    (50u32..800, 1u32..6, 5u32..=100, any::<bool>(), any::<u64>()).prop_map(
        |(canvas, per_row, intensity, only_lines, seed)| LabConfig {
            canvas_size: f64::from(canvas),
            areas_per_row: per_row,
            intensity: f64::from(intensity) / 100.0,
            only_lines,
            seed: Some(seed),
            ..Default::default()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn render_keeps_the_stack_balanced(root in drawable_root(), seed in any::<u64>()) {
        let mut surface = RecordingSurface::new();
        FractalRenderer::squares().render(&mut surface, root, &mut RngDirections::seeded(seed));

        let stats = surface.stats();
        prop_assert_eq!(stats.saves, stats.restores);
        prop_assert_eq!(stats.unmatched_restores, 0);
        prop_assert_eq!(surface.depth(), 0);
        prop_assert_eq!(surface.transform(), Transform2D::IDENTITY);
    }

    #[test]
    fn node_count_matches_closed_form(root in drawable_root(), seed in any::<u64>()) {
        let mut surface = RecordingSurface::new();
        let stats = FractalRenderer::lines().render(&mut surface, root, &mut RngDirections::seeded(seed));

        prop_assert_eq!(stats.nodes, node_count_for(root, 4.0));
        prop_assert_eq!(stats.max_level, levels_for(root, 4.0));
        prop_assert_eq!(surface.stroke_count(), stats.nodes);
        prop_assert!(stats.smallest > 4.0);
        prop_assert!(stats.largest <= root);
    }

    #[test]
    fn roots_at_or_below_minimum_paint_nothing(
        root in (-10_000i32..=400).prop_map(|v| f64::from(v) * 0.01),
        seed in any::<u64>(),
    ) {
        let mut surface = RecordingSurface::new();
        let stats = FractalRenderer::squares().render(&mut surface, root, &mut RngDirections::seeded(seed));

        prop_assert_eq!(stats.nodes, 0);
        prop_assert!(surface.calls().is_empty());
        prop_assert_eq!(surface.stats().saves, 0);
    }

    #[test]
    fn tiled_lab_invariants(config in lab_config_strategy()) {
        let mut surface = RecordingSurface::new();
        let mut directions = config.directions();
        let summary = Lab::Tiled.draw(&mut surface, &config, &mut directions).unwrap();

        let n = config.areas_per_row as usize;
        prop_assert_eq!(summary.tiles, n * n);
        prop_assert_eq!(summary.stats.nodes, surface.calls().len());

        let stats = surface.stats();
        prop_assert_eq!(stats.saves, stats.restores);
        prop_assert_eq!(surface.depth(), 0);
        prop_assert_eq!(surface.transform(), Transform2D::IDENTITY);
    }
}
