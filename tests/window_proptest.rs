//! Property tests for the view window and colour assignment.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bubbleview::render::BubbleColor;
use bubbleview::{Step, ViewWindow};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Increase,
    Decrease,
    SetStep(Step),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Increase),
        Just(Op::Decrease),
        prop::sample::select(Step::ALL.to_vec()).prop_map(Op::SetStep),
    ]
}

proptest! {
    /// After every increase/decrease, `step <= count <= len` (len covers every step).
    #[test]
    fn window_stays_clamped(len in 100usize..400, ops in prop::collection::vec(op(), 1..60)) {
        let mut window = ViewWindow::default();
        for op in ops {
            match op {
                Op::Increase => window.increase(len),
                Op::Decrease => window.decrease(len),
                Op::SetStep(step) => {
                    let before = window.visible_count();
                    window.set_step(step);
                    prop_assert_eq!(window.visible_count(), before);
                    continue;
                }
            }
            prop_assert!(window.visible_count() >= window.step().get());
            prop_assert!(window.visible_count() <= len);
        }
    }

    /// The shown prefix never exceeds the dataset, whatever its size.
    #[test]
    fn visible_len_never_exceeds_dataset(len in 0usize..50, ops in prop::collection::vec(op(), 0..30)) {
        let mut window = ViewWindow::default();
        for op in ops {
            match op {
                Op::Increase => window.increase(len),
                Op::Decrease => window.decrease(len),
                Op::SetStep(step) => window.set_step(step),
            }
            prop_assert!(window.visible_len(len) <= len);
        }
    }

    /// Decreasing at `count == step` changes nothing.
    #[test]
    fn decrease_at_step_is_noop(step in prop::sample::select(Step::ALL.to_vec()), extra in 0usize..500) {
        let len = step.get() + extra;
        let mut window = ViewWindow::new(step.get(), step);
        window.decrease(len);
        prop_assert_eq!(window.visible_count(), step.get());
    }

    /// Colour depends only on `floor(x) mod 4`.
    #[test]
    fn color_is_periodic(whole in 0u32..1_000_000, frac in 0.0f64..0.5, k in 0u32..1000) {
        let x = f64::from(whole) + frac;
        let shifted = x + f64::from(k) * 4.0;
        prop_assert_eq!(BubbleColor::for_x(x), BubbleColor::for_x(shifted));
        prop_assert_ne!(BubbleColor::for_x(x), BubbleColor::SteelBlue);
    }
}
