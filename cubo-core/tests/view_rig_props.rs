/// Property-based tests for view rig invariants using the `proptest` crate.
use proptest::prelude::*;

use cubo_core::{RigConfig, ViewRig};

#[derive(Debug, Clone)]
enum Input {
    Down,
    Up,
    Move(f32, f32),
    Scroll(f32),
    Idle,
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Down),
        Just(Input::Up),
        (-2000.0f32..2000.0, -2000.0f32..2000.0).prop_map(|(x, y)| Input::Move(x, y)),
        (-5000.0f32..5000.0).prop_map(Input::Scroll),
        Just(Input::Idle),
    ]
}

fn apply(rig: &mut ViewRig, input: &Input) {
    match *input {
        Input::Down => rig.on_pointer_down(),
        Input::Up => rig.on_pointer_up(),
        Input::Move(x, y) => rig.on_pointer_move(x, y),
        Input::Scroll(dy) => rig.on_scroll(dy),
        Input::Idle => rig.on_idle_step(),
    }
}

// ---------------------------------------------------------------------------
// Camera distance never leaves [min, max]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn distance_stays_clamped(inputs in prop::collection::vec(arb_input(), 0..200)) {
        let config = RigConfig::default();
        let mut rig = ViewRig::new(config);
        for input in &inputs {
            apply(&mut rig, input);
            let d = rig.state().camera_distance;
            prop_assert!(d >= config.min_distance && d <= config.max_distance,
                "distance {} escaped after {:?}", d, input);
        }
    }
}

// ---------------------------------------------------------------------------
// Idle steps never rotate while a drag is active
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn idle_suppressed_while_dragging(
        inputs in prop::collection::vec(arb_input(), 0..100),
        idle_steps in 1usize..50,
    ) {
        let mut rig = ViewRig::default();
        for input in &inputs {
            apply(&mut rig, input);
        }
        rig.on_pointer_down();
        let held = rig.state().rotation;
        for _ in 0..idle_steps {
            rig.on_idle_step();
        }
        prop_assert_eq!(rig.state().rotation, held);
    }
}

// ---------------------------------------------------------------------------
// A drag path rotates by its total displacement, however it is split
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn drag_rotation_telescopes(
        start in (-500.0f32..500.0, -500.0f32..500.0),
        path in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..30),
    ) {
        let mut rig = ViewRig::default();
        rig.on_pointer_move(start.0, start.1);
        rig.on_pointer_down();
        for &(x, y) in &path {
            rig.on_pointer_move(x, y);
        }
        let (end_x, end_y) = path[path.len() - 1];
        let k = rig.config().drag_sensitivity;
        let rotation = rig.state().rotation;
        prop_assert!((rotation.y - (end_x - start.0) * k).abs() < 1e-2);
        prop_assert!((rotation.x - (end_y - start.1) * k).abs() < 1e-2);
    }
}

// ---------------------------------------------------------------------------
// Last pointer always reflects the latest move
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn last_pointer_tracks_every_move(inputs in prop::collection::vec(arb_input(), 1..100)) {
        let mut rig = ViewRig::default();
        let mut expected = (0.0, 0.0);
        for input in &inputs {
            apply(&mut rig, input);
            if let Input::Move(x, y) = *input {
                expected = (x, y);
            }
            prop_assert_eq!(rig.state().last_pointer, expected);
        }
    }
}
