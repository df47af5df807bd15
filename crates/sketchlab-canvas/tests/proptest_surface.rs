//! Property tests for the recording surface's state stack.
//!
//! These tests use `proptest` to generate random sequences of surface
//! operations and check the stack counters against a simple model.

use proptest::prelude::*;
use sketchlab_canvas::prelude::*;

/// Operations we can perform on a surface.
#[derive(Debug, Clone)]
enum SurfaceOp {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Fill(u8),
    Rect(f64),
    Line(f64),
}

/// Finite offsets in `[-500, 500]`.
fn offset() -> impl Strategy<Value = f64> {
    (-50_000i32..=50_000).prop_map(|v| f64::from(v) * 0.01)
}

fn drawing_op() -> impl Strategy<Value = SurfaceOp> {
    prop_oneof![
        (offset(), offset()).prop_map(|(x, y)| SurfaceOp::Translate(x, y)),
        (-628i32..=628).prop_map(|v| SurfaceOp::Rotate(f64::from(v) * 0.01)),
        any::<u8>().prop_map(SurfaceOp::Fill),
        offset().prop_map(SurfaceOp::Rect),
        offset().prop_map(SurfaceOp::Line),
    ]
}

fn any_op() -> impl Strategy<Value = SurfaceOp> {
    prop_oneof![Just(SurfaceOp::Save), Just(SurfaceOp::Restore), drawing_op()]
}

fn apply(surface: &mut dyn DrawingSurface, op: &SurfaceOp) {
    match *op {
        SurfaceOp::Save => surface.save(),
        SurfaceOp::Restore => surface.restore(),
        SurfaceOp::Translate(x, y) => surface.translate(x, y),
        SurfaceOp::Rotate(r) => surface.rotate(r),
        SurfaceOp::Fill(g) => surface.set_fill_color(Rgba::opaque(g, g, g)),
        SurfaceOp::Rect(s) => surface.fill_rect(0.0, 0.0, s, s),
        SurfaceOp::Line(s) => surface.stroke_line(0.0, 0.0, s, s),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    #[test]
    fn stack_counters_match_model(ops in prop::collection::vec(any_op(), 0..100)) {
        let mut surface = RecordingSurface::new();
        let mut depth = 0usize;
        let mut max_depth = 0usize;
        let (mut saves, mut restores, mut unmatched) = (0usize, 0usize, 0usize);

        for op in &ops {
            apply(&mut surface, op);
            match op {
                SurfaceOp::Save => {
                    saves += 1;
                    depth += 1;
                    max_depth = max_depth.max(depth);
                }
                SurfaceOp::Restore if depth == 0 => unmatched += 1,
                SurfaceOp::Restore => {
                    restores += 1;
                    depth -= 1;
                }
                _ => {}
            }
            prop_assert_eq!(surface.depth(), depth);
        }

        let stats = surface.stats();
        prop_assert_eq!(stats.saves, saves);
        prop_assert_eq!(stats.restores, restores);
        prop_assert_eq!(stats.unmatched_restores, unmatched);
        prop_assert_eq!(stats.max_depth, max_depth);
    }

    #[test]
    fn scoped_ops_leave_state_untouched(
        outer in prop::collection::vec(drawing_op(), 0..20),
        inner in prop::collection::vec(drawing_op(), 0..50),
    ) {
        let mut surface = RecordingSurface::new();
        for op in &outer {
            apply(&mut surface, op);
        }
        let transform = surface.transform();
        let fill = surface.fill_color();
        let calls_before = surface.calls().len();

        {
            let mut scope = ScopedSurface::new(&mut surface);
            for op in &inner {
                apply(&mut *scope, op);
            }
        }

        prop_assert_eq!(surface.transform(), transform);
        prop_assert_eq!(surface.fill_color(), fill);
        prop_assert_eq!(surface.depth(), 0);

        let painted = inner
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Rect(_) | SurfaceOp::Line(_)))
            .count();
        prop_assert_eq!(surface.calls().len(), calls_before + painted);
    }

    #[test]
    fn calls_record_the_depth_they_were_made_at(ops in prop::collection::vec(any_op(), 0..100)) {
        let mut surface = RecordingSurface::new();
        let mut expected = Vec::new();
        for op in &ops {
            apply(&mut surface, op);
            if matches!(op, SurfaceOp::Rect(_) | SurfaceOp::Line(_)) {
                expected.push(surface.depth());
            }
        }
        let recorded: Vec<usize> = surface.calls().iter().map(|c| c.depth).collect();
        prop_assert_eq!(recorded, expected);
    }
}
