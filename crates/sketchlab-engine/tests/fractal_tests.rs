//! Integration tests for the recursive fractal renderer.
//!
//! Everything here draws onto a [`RecordingSurface`] and inspects the
//! recorded paint calls and state-stack counters.

use sketchlab_engine::fractal::{BUBBLEGUM, SEAFOAM};
use sketchlab_engine::prelude::*;

/// Render a seeded square fractal and return the surface and stats.
fn render_seeded(root: f64, seed: u64) -> (RecordingSurface, RenderStats) {
    let mut surface = RecordingSurface::new();
    let stats = FractalRenderer::squares().render(&mut surface, root, &mut RngDirections::seeded(seed));
    (surface, stats)
}

/// Side length of a painted rect.
fn width_of(call: &PaintCall) -> f64 {
    match call.shape {
        Shape::Rect { width, .. } => width,
        Shape::Line { x2, .. } => x2,
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

#[test]
fn root_below_minimum_draws_nothing() {
    let (surface, stats) = render_seeded(3.0, 1);
    assert_eq!(stats, RenderStats::default());
    assert!(surface.calls().is_empty());
    assert_eq!(surface.stats().saves, 0);
    assert_eq!(surface.stats().restores, 0);
}

#[test]
fn root_exactly_at_minimum_draws_nothing() {
    let (surface, stats) = render_seeded(4.0, 1);
    assert_eq!(stats.nodes, 0);
    assert!(surface.calls().is_empty());
}

#[test]
fn non_finite_roots_draw_nothing() {
    for root in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let (surface, stats) = render_seeded(root, 1);
        assert_eq!(stats.nodes, 0, "root {root} should draw nothing");
        assert!(surface.calls().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Tree shape
// ---------------------------------------------------------------------------

#[test]
fn root_500_paints_a_full_tree() {
    let (surface, stats) = render_seeded(500.0, 2024);

    assert_eq!(stats.nodes, (1 << 14) - 1);
    assert_eq!(stats.max_level, 14);
    assert_eq!(surface.fill_count(), stats.nodes);
    assert_eq!(surface.stroke_count(), 0);

    for call in surface.calls() {
        let w = width_of(call);
        assert!(w > 4.0 && w <= 500.0, "painted size {w} out of range");
    }
    assert!((stats.largest - 500.0).abs() < 1e-12);
    assert!(stats.smallest > 4.0);
}

#[test]
fn each_level_shrinks_by_root_two_over_two() {
    let root = 200.0;
    let (surface, _) = render_seeded(root, 11);

    let levels = levels_for(root, 4.0);
    let mut sizes = vec![root];
    for _ in 1..levels {
        let next = sizes[sizes.len() - 1] * std::f64::consts::SQRT_2 / 2.0;
        sizes.push(next);
    }

    for (level, size) in sizes.iter().enumerate() {
        let count = surface
            .calls()
            .iter()
            .filter(|c| (width_of(c) - size).abs() < 1e-9)
            .count();
        assert_eq!(count, 1 << level, "level {level} (size {size}) node count");
    }
    for pair in sizes.windows(2) {
        assert!((pair[1] / pair[0] - BRANCH_SCALE).abs() < 1e-9);
    }
}

#[test]
fn node_count_does_not_depend_on_directions() {
    let renderer = FractalRenderer::squares();
    let mut counts = Vec::new();
    for dir in [Direction::Left, Direction::Right] {
        let mut surface = RecordingSurface::new();
        counts.push(renderer.render(&mut surface, 90.0, &mut ConstantDirections(dir)).nodes);
    }
    for seed in 0..4 {
        counts.push(render_seeded(90.0, seed).1.nodes);
    }
    assert!(counts.iter().all(|&n| n == node_count_for(90.0, 4.0)));
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[test]
fn color_follows_node_size() {
    let (surface, _) = render_seeded(120.0, 5);
    let mut small = 0;
    let mut large = 0;
    for call in surface.calls() {
        if width_of(call) <= 25.0 {
            assert_eq!(call.color, BUBBLEGUM);
            small += 1;
        } else {
            assert_eq!((call.color.r, call.color.g, call.color.b), (SEAFOAM.r, SEAFOAM.g, SEAFOAM.b));
            assert!((call.color.a - 0.7).abs() < 1e-6);
            large += 1;
        }
    }
    assert!(small > 0 && large > 0);
}

#[test]
fn custom_style_is_honored() {
    let style = FractalStyle {
        small_color: Rgba::WHITE,
        large_color: Rgba::BLACK,
        small_threshold: 50.0,
        min_size: 20.0,
        ..FractalStyle::default()
    };
    let mut surface = RecordingSurface::new();
    let stats = FractalRenderer::new(false, style).render(&mut surface, 80.0, &mut RngDirections::seeded(3));

    // The fourth level lands within rounding of 20, so ask the helper.
    assert_eq!(stats.nodes, node_count_for(80.0, 20.0));
    for call in surface.calls() {
        let expected = if width_of(call) <= 50.0 { Rgba::WHITE } else { Rgba::BLACK };
        assert_eq!(call.color, expected);
    }
}

#[test]
fn lines_are_gray_whatever_their_size() {
    let mut surface = RecordingSurface::new();
    let stats = FractalRenderer::lines().render(&mut surface, 60.0, &mut RngDirections::seeded(1));
    assert_eq!(surface.stroke_count(), stats.nodes);
    for call in surface.calls() {
        assert_eq!(call.color, Rgba::GRAY, "stroke of size {} colored {}", width_of(call), call.color);
    }
}

// ---------------------------------------------------------------------------
// Surface state
// ---------------------------------------------------------------------------

#[test]
fn saves_and_restores_balance() {
    let (surface, _) = render_seeded(500.0, 77);
    let stats = surface.stats();
    assert_eq!(stats.saves, stats.restores);
    assert_eq!(stats.unmatched_restores, 0);
    assert_eq!(surface.depth(), 0);
    assert_eq!(surface.transform(), Transform2D::IDENTITY);
}

#[test]
fn stack_depth_grows_only_along_top_branches() {
    // One outer scope, plus one scope per level along the all-top path.
    let root = 500.0;
    let (surface, _) = render_seeded(root, 8);
    assert_eq!(surface.stats().max_depth, levels_for(root, 4.0) + 1);
}

#[test]
fn render_leaves_a_moved_surface_where_it_was() {
    let mut surface = RecordingSurface::new();
    surface.translate(350.0, 350.0);
    surface.rotate(0.3);
    surface.set_fill_color(Rgba::WHITE);
    surface.save();
    let before = surface.transform();

    FractalRenderer::squares().render(&mut surface, 150.0, &mut RngDirections::seeded(4));

    assert_eq!(surface.transform(), before);
    assert_eq!(surface.fill_color(), Rgba::WHITE);
    assert_eq!(surface.depth(), 1);
}

#[test]
fn root_is_centered_on_the_current_origin() {
    let mut surface = RecordingSurface::new();
    surface.translate(100.0, 40.0);
    FractalRenderer::squares().render(&mut surface, 60.0, &mut RngDirections::seeded(6));

    let root = &surface.calls()[0];
    let corners = root.canvas_points();
    assert_eq!(corners[0], Point::new(70.0, 10.0));
    assert_eq!(corners[2], Point::new(130.0, 70.0));
}

#[test]
fn left_and_right_trees_are_mirror_images() {
    let renderer = FractalRenderer::squares();
    let mut left = RecordingSurface::new();
    let mut right = RecordingSurface::new();
    renderer.render(&mut left, 60.0, &mut ConstantDirections(Direction::Left));
    renderer.render(&mut right, 60.0, &mut ConstantDirections(Direction::Right));

    assert_eq!(left.calls().len(), right.calls().len());
    for (l, r) in left.calls().iter().zip(right.calls()) {
        let lc = l.transform.offset();
        let rc = r.transform.offset();
        assert!((lc.x + rc.x).abs() < 1e-9, "x not mirrored: {lc:?} vs {rc:?}");
        assert!((lc.y - rc.y).abs() < 1e-9, "y differs: {lc:?} vs {rc:?}");
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn same_seed_same_scene() {
    let (a, _) = render_seeded(300.0, 99);
    let (b, _) = render_seeded(300.0, 99);
    let sa = Scene::capture(&a, 700.0, 700.0);
    let sb = Scene::capture(&b, 700.0, 700.0);
    assert_eq!(sa.digest(), sb.digest());
    assert_eq!(sa, sb);
}

#[test]
fn different_seeds_different_scenes() {
    let (a, _) = render_seeded(300.0, 1);
    let (b, _) = render_seeded(300.0, 2);
    let sa = Scene::capture(&a, 700.0, 700.0);
    let sb = Scene::capture(&b, 700.0, 700.0);
    assert_eq!(sa.len(), sb.len());
    assert_ne!(sa.digest(), sb.digest());
}

#[test]
fn scripted_directions_are_consumed_two_per_child() {
    let mut directions = ScriptedDirections::new(vec![Direction::Right]);
    let mut surface = RecordingSurface::new();
    let stats = FractalRenderer::lines().render(&mut surface, 40.0, &mut directions);
    // Root sample plus two samples for each of the two children of every
    // painted node.
    assert_eq!(directions.drawn(), 2 + 4 * stats.nodes);
}
