//! Frame tick
//!
//! Consumes one frame of input, advances the active scene and polls the
//! timeline. Scene changes go through `enter_scene`, which resets whatever
//! substate the new scene owns.

use glam::DVec2;

use super::integrator;
use super::orientation::Orientation;
use super::rules::{self, random_in};
use super::scene::{Scene, TimedAction};
use super::state::{DecorCube, GameState, PointerState, RigidObject};
use crate::Viewport;
use crate::consts::{START_ROTATION_Y, TILT_SENSOR_LIMIT};
use crate::levels::LevelBehavior;
use crate::tuning::GrowthModel;

pub const SHATTER_MESSAGE: &str = "It shattered under its own weight.";
pub const TILT_MESSAGE: &str = "What's happening...?";
pub const WIN_MESSAGE: &str = "It made it to the top. Tap to continue.";
const WIN_MESSAGE_TICKS: u64 = 600;

/// Played after the won cube has fallen out of view: `(delay_ticks, text)`
const SMASH_SEQUENCE: &[(u64, &str)] = &[
    (30, "...it fell."),
    (130, "Maybe it was never meant to stay up there."),
];
const SMASH_RESTART_DELAY: u64 = 260;
/// Spin given to the won cube when it is knocked loose
const SMASH_SPIN: DVec2 = DVec2::new(0.04, -0.06);

/// Input gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap or click anywhere (title start, win continue)
    pub tap: bool,
    /// Pointer pressed at this position
    pub pointer_down: Option<DVec2>,
    /// Latest pointer position while moving
    pub pointer_move: Option<DVec2>,
    pub pointer_up: bool,
    /// Device front-to-back tilt in degrees
    pub tilt_beta: Option<f64>,
    /// Restart the current attempt
    pub reset: bool,
    pub resize: Option<Viewport>,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if let Some(viewport) = input.resize {
        resize(state, viewport);
    }

    handle_commands(state, input);
    if let Some(beta) = input.tilt_beta {
        handle_tilt(state, beta);
    }
    handle_pointer(state, input);

    match state.scene() {
        Scene::Title => {
            state.title.rotation_y += state.tuning.title_spin;
        }
        Scene::Transitioning | Scene::Restarting => update_rain(state),
        Scene::Playing => update_playing(state),
        Scene::Won => {}
        Scene::Collapsing => update_collapsing(state),
        Scene::Smashing { anchor_passed } => update_smashing(state, anchor_passed),
    }

    run_timeline(state);
    state.expire_message();
}

/// Switch scene and reset the substate it owns
pub fn enter_scene(state: &mut GameState, scene: Scene) {
    let previous = state.scene();
    let epoch = state.clock.enter(scene, state.time_ticks);
    log::info!(
        "Scene {} -> {} (tick {}, epoch {})",
        previous.name(),
        scene.name(),
        state.time_ticks,
        epoch
    );

    match scene {
        Scene::Title => {
            state.objects.clear();
            state.decor.clear();
            state.title = Default::default();
        }
        Scene::Transitioning | Scene::Restarting => {
            let level = state.level;
            level.cleanup(state);
            state.objects.clear();
            state.pointer = PointerState::default();
            spawn_decor(state);
        }
        Scene::Playing => start_level(state, epoch),
        Scene::Won => {
            for object in &mut state.objects {
                object.freeze();
            }
            state.pointer.dragging = false;
            // A tilt win leaves the device flipped
            state.tilt_armed = state.upward_force == 0.0;
            state.upward_force = 0.0;
            state.show_message(WIN_MESSAGE, WIN_MESSAGE_TICKS);
        }
        Scene::Collapsing => {
            state.pointer = PointerState::default();
            state.upward_force = 0.0;
            let ticks = state.tuning.message_ticks;
            state.show_message(SHATTER_MESSAGE, ticks);
            let delay = state.tuning.collapse_restart_ticks;
            state.timeline.schedule(
                state.time_ticks,
                delay,
                epoch,
                TimedAction::EnterScene(Scene::Restarting),
            );
        }
        Scene::Smashing { .. } => {
            state.message = None;
            for object in &mut state.objects {
                object.spin = SMASH_SPIN;
            }
        }
    }
}

/// Adopt a new canvas size, keeping live objects on screen
pub fn resize(state: &mut GameState, viewport: Viewport) {
    if viewport == state.viewport {
        return;
    }
    log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
    state.viewport = viewport;

    let layout = state.level.setup(&viewport, &state.tuning);
    state.target = layout.target;
    if state.scene().owns_level() {
        state.platforms = layout.platforms;
    }

    let (w, h) = (viewport.width, viewport.height);
    for object in &mut state.objects {
        let half = object.half_size();
        object.pos.x = object.pos.x.min(w - half).max(half);
        object.pos.y = object.pos.y.min(h - half).max(half);
    }
}

fn handle_commands(state: &mut GameState, input: &TickInput) {
    match state.scene() {
        Scene::Title if input.tap => enter_scene(state, Scene::Transitioning),
        Scene::Playing if input.reset => enter_scene(state, Scene::Playing),
        Scene::Won if input.reset => enter_scene(state, Scene::Playing),
        Scene::Won if input.tap => {
            state.level = state.level.next();
            enter_scene(state, Scene::Playing);
        }
        Scene::Collapsing if input.reset => enter_scene(state, Scene::Restarting),
        _ => {}
    }
}

fn handle_tilt(state: &mut GameState, beta: f64) {
    if !beta.is_finite() || beta.abs() > TILT_SENSOR_LIMIT {
        log::warn!("Ignoring implausible tilt reading {beta}");
        return;
    }
    let flipped = beta.abs() > state.tuning.tilt_threshold_deg;

    match state.scene() {
        Scene::Playing => {
            if !flipped {
                state.upward_force = 0.0;
                return;
            }
            state.upward_force = state.tuning.tilt_upward_force;
            if state.objects.len() == 1 {
                let ticks = state.tuning.message_ticks;
                state.show_message(TILT_MESSAGE, ticks);
            }
        }
        Scene::Won if !flipped => state.tilt_armed = true,
        Scene::Won if state.tilt_armed => {
            state.tilt_armed = false;
            enter_scene(state, Scene::Smashing { anchor_passed: false });
        }
        _ => {}
    }
}

fn handle_pointer(state: &mut GameState, input: &TickInput) {
    match state.scene() {
        Scene::Playing => drag_cube(state, input),
        Scene::Collapsing => swipe_restart(state, input),
        _ => {}
    }
}

fn drag_cube(state: &mut GameState, input: &TickInput) {
    if let Some(pos) = input.pointer_down {
        if let Some(cube) = state.primary_mut() {
            cube.freeze();
            state.pointer = PointerState {
                dragging: true,
                last: pos,
                drag_distance: 0.0,
                swipe_start: None,
            };
        }
    }

    if let Some(pos) = input.pointer_move {
        if state.pointer.dragging {
            let delta = pos - state.pointer.last;
            state.pointer.last = pos;
            push_cube(state, delta);
        }
    }

    if input.pointer_up && state.pointer.dragging {
        state.pointer.dragging = false;
        finish_push(state);
    }
}

fn push_cube(state: &mut GameState, delta: DVec2) {
    let distance = delta.length();
    if !distance.is_finite() || distance == 0.0 {
        return;
    }

    let max = state.max_size();
    let height = state.viewport.height;
    let tuning = &state.tuning;
    let (push, spin, exponent, growth) = (
        tuning.push_multiplier,
        tuning.spin_per_pixel,
        tuning.mass_exponent,
        tuning.growth,
    );

    state.total_distance_pushed += distance;
    state.pointer.drag_distance += distance;
    let total = state.total_distance_pushed;

    let Some(cube) = state.primary_mut() else {
        return;
    };
    if let GrowthModel::Continuous { rate } = growth {
        let size = rules::size_for_distance(cube.base_size, total, height, rate, max);
        cube.set_size(size);
    }
    let mass = cube.mass(exponent);
    integrator::apply_push(cube, delta, push, spin, mass);
}

/// A drag ended: count it and apply discrete growth
fn finish_push(state: &mut GameState) {
    let drag = state.pointer.drag_distance;
    let max = state.max_size();
    match state.tuning.growth {
        GrowthModel::Continuous { .. } => {
            if drag > 0.0 {
                state.push_count += 1;
            }
        }
        GrowthModel::Discrete { factor, min_push } => {
            if drag < min_push {
                return;
            }
            state.push_count += 1;
            if let Some(cube) = state.primary_mut() {
                let size = rules::grow_discrete(cube.size, factor, max);
                cube.set_size(size);
            }
        }
    }
    log::debug!("Push {} finished after {drag:.1}px", state.push_count);
}

fn swipe_restart(state: &mut GameState, input: &TickInput) {
    if let Some(pos) = input.pointer_down {
        state.pointer.swipe_start = Some(pos);
    }
    if let (Some(start), Some(pos)) = (state.pointer.swipe_start, input.pointer_move) {
        if (pos - start).length() > state.tuning.swipe_restart_distance {
            enter_scene(state, Scene::Restarting);
            return;
        }
    }
    if input.pointer_up {
        state.pointer.swipe_start = None;
    }
}

fn spawn_decor(state: &mut GameState) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let tau = std::f64::consts::TAU;

    state.decor = (0..tuning.decor_count)
        .map(|_| DecorCube {
            pos: DVec2::new(random_in(rng, 0.0, w), -random_in(rng, 0.0, h)),
            size: random_in(rng, tuning.decor_size_min, tuning.decor_size_max),
            orientation: Orientation::euler(random_in(rng, 0.0, tau), random_in(rng, 0.0, tau)),
            spin: DVec2::new(
                random_in(rng, -tuning.decor_spin, tuning.decor_spin),
                random_in(rng, -tuning.decor_spin, tuning.decor_spin),
            ),
            speed: random_in(rng, tuning.decor_speed_min, tuning.decor_speed_max),
        })
        .collect();
}

fn update_rain(state: &mut GameState) {
    for cube in &mut state.decor {
        cube.pos.y += cube.speed;
        cube.orientation.apply_spin(cube.spin);
    }
    let viewport = state.viewport;
    if state.decor.iter().all(|cube| cube.exited(&viewport)) {
        state.decor.clear();
        enter_scene(state, Scene::Playing);
    }
}

fn start_level(state: &mut GameState, epoch: u32) {
    let level = state.level;
    level.cleanup(state);

    let layout = level.setup(&state.viewport, &state.tuning);
    state.target = layout.target;
    state.platforms = layout.platforms;

    let id = state.next_entity_id();
    let cube = RigidObject::new(id, layout.start, state.tuning.start_size)
        .with_orientation(Orientation::euler(0.0, START_ROTATION_Y));
    state.objects = vec![cube];
    state.decor.clear();

    state.total_distance_pushed = 0.0;
    state.push_count = 0;
    state.upward_force = 0.0;
    state.pointer = PointerState::default();

    let ticks = state.tuning.message_ticks;
    for (delay, text) in layout.intro {
        state.timeline.schedule(
            state.time_ticks,
            delay,
            epoch,
            TimedAction::ShowMessage {
                text: text.to_string(),
                duration: ticks,
            },
        );
    }
    log::info!("Level {} ready", level.name());
}

fn update_playing(state: &mut GameState) {
    let level = state.level;
    level.update(state);

    let params = state.tuning.physics();
    let bounds = state.bounds();
    let force = if state.objects.len() == 1 {
        DVec2::new(0.0, -state.upward_force)
    } else {
        DVec2::ZERO
    };
    for object in &mut state.objects {
        integrator::step(object, force, &params, &bounds, &state.platforms);
    }

    let max = state.max_size();
    let tuning = &state.tuning;
    let Some(cube) = state.primary() else {
        return;
    };
    if rules::is_win(
        cube.pos,
        cube.size,
        &state.target,
        cube.base_size,
        tuning.win_size_tolerance,
    ) {
        enter_scene(state, Scene::Won);
    } else if rules::should_shatter(cube, tuning.shatter_rule, max, state.push_count) {
        shatter_primary(state);
    }
}

fn shatter_primary(state: &mut GameState) {
    let Some(parent) = state.objects.pop() else {
        return;
    };
    let mut shards = rules::shatter(&parent, &state.tuning, &mut state.rng);
    for shard in &mut shards {
        shard.id = state.next_entity_id();
    }
    log::debug!(
        "Cube {} shattered at size {:.1} into {} shards",
        parent.id,
        parent.size,
        shards.len()
    );
    state.objects = shards;
    enter_scene(state, Scene::Collapsing);
}

fn update_collapsing(state: &mut GameState) {
    let params = state.tuning.physics();
    let bounds = state.bounds();
    let decay = state.tuning.shard_decay;
    for shard in &mut state.objects {
        integrator::step(shard, DVec2::ZERO, &params, &bounds, &state.platforms);
        integrator::decay(shard, decay);
    }
    state.objects.retain(|shard| !shard.is_dead());
}

fn update_smashing(state: &mut GameState, anchor_passed: bool) {
    let params = state.tuning.physics();
    let gravity = DVec2::new(0.0, state.tuning.smash_gravity);
    for object in &mut state.objects {
        integrator::advance(object, gravity, &params);
    }
    if anchor_passed {
        return;
    }

    let floor = state.viewport.height;
    if state
        .objects
        .iter()
        .all(|object| object.pos.y - object.half_size() > floor)
    {
        // Same scene, same epoch: only the substate flips
        state.clock.scene = Scene::Smashing { anchor_passed: true };
        let (now, epoch) = (state.time_ticks, state.clock.epoch);
        let ticks = state.tuning.message_ticks;
        for (delay, text) in SMASH_SEQUENCE {
            state.timeline.schedule(
                now,
                *delay,
                epoch,
                TimedAction::ShowMessage {
                    text: text.to_string(),
                    duration: ticks,
                },
            );
        }
        state.timeline.schedule(
            now,
            SMASH_RESTART_DELAY,
            epoch,
            TimedAction::EnterScene(Scene::Playing),
        );
    }
}

fn run_timeline(state: &mut GameState) {
    let due = state.timeline.drain_due(state.time_ticks, state.clock.epoch);
    for action in due {
        match action {
            TimedAction::ShowMessage { text, duration } => state.show_message(text, duration),
            TimedAction::EnterScene(scene) => {
                // Anything else due belonged to the scene being left
                enter_scene(state, scene);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use crate::tuning::{ShatterRule, Tuning};

    const W: f64 = 1200.0;
    const H: f64 = 800.0;

    fn state_with(tuning: Tuning) -> GameState {
        GameState::new(42, Viewport::new(W, H), tuning, Level::Open)
    }

    fn playing(tuning: Tuning) -> GameState {
        let mut state = state_with(tuning);
        enter_scene(&mut state, Scene::Playing);
        state
    }

    fn idle(state: &mut GameState, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &TickInput::default());
        }
    }

    fn drag(state: &mut GameState, from: DVec2, to: DVec2) {
        tick(
            state,
            &TickInput {
                pointer_down: Some(from),
                ..Default::default()
            },
        );
        tick(
            state,
            &TickInput {
                pointer_move: Some(to),
                pointer_up: true,
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_title_tap_rains_then_plays() {
        let mut state = state_with(Tuning::default());
        idle(&mut state, 3);
        assert_eq!(state.scene(), Scene::Title);
        assert!(state.title.rotation_y > 0.0);

        tick(
            &mut state,
            &TickInput {
                tap: true,
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Transitioning);
        assert_eq!(state.decor.len(), 200);

        for _ in 0..1000 {
            if state.scene() == Scene::Playing {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.scene(), Scene::Playing);
        assert!(state.decor.is_empty());
        let cube = state.primary().expect("one cube in play");
        assert_eq!(cube.size, 50.0);
        assert_eq!(cube.orientation, Orientation::euler(0.0, START_ROTATION_Y));
    }

    #[test]
    fn test_playing_entry_places_cube_above_floor() {
        let state = playing(Tuning::default());
        let cube = state.primary().expect("cube");
        assert_eq!(cube.pos, DVec2::new(W / 2.0, H - 75.0));
        assert_eq!(cube.vel, DVec2::ZERO);
    }

    #[test]
    fn test_drag_pushes_and_grows_then_settles() {
        let mut state = playing(Tuning::default());
        let start = state.start_position();
        drag(&mut state, start, start + DVec2::new(0.0, -500.0));

        assert_eq!(state.push_count, 1);
        assert_eq!(state.total_distance_pushed, 500.0);
        let cube = state.primary().expect("cube");
        assert!(cube.size > 50.0);
        assert!(cube.vel.y < 0.0);

        idle(&mut state, 200);
        assert_eq!(state.scene(), Scene::Playing);
        let cube = state.primary().expect("cube");
        assert!(cube.vel.y.abs() < 0.01);
    }

    #[test]
    fn test_pointer_down_stops_cube() {
        let mut state = playing(Tuning::default());
        if let Some(cube) = state.primary_mut() {
            cube.vel = DVec2::new(3.0, -4.0);
            cube.spin = DVec2::new(0.1, 0.1);
        }
        tick(
            &mut state,
            &TickInput {
                pointer_down: Some(DVec2::new(10.0, 10.0)),
                ..Default::default()
            },
        );
        let cube = state.primary().expect("cube");
        assert_eq!(cube.vel, DVec2::ZERO);
        assert!(state.pointer.dragging);
    }

    #[test]
    fn test_overgrown_cube_shatters_and_restarts() {
        let mut state = playing(Tuning::default());
        let start = state.start_position();
        drag(&mut state, start, start + DVec2::new(-100.0, -8000.0));

        assert_eq!(state.scene(), Scene::Collapsing);
        assert_eq!(state.objects.len(), 8);
        assert!(state.objects.iter().all(|s| s.size < 300.0 && s.id > 1));
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some(SHATTER_MESSAGE));

        idle(&mut state, 119);
        assert_eq!(state.scene(), Scene::Collapsing);
        // Shards are fading
        assert!(state.objects.iter().all(|s| s.opacity() < 0.1));
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Restarting);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_swipe_restart_cancels_pending_timer() {
        let tuning = Tuning {
            shatter_rule: ShatterRule::BaseMultiple { multiple: 1.1 },
            decor_speed_min: 5.0,
            decor_speed_max: 5.0,
            ..Tuning::default()
        };
        let mut state = playing(tuning);
        let start = state.start_position();
        drag(&mut state, start, start + DVec2::new(0.0, -200.0));
        assert_eq!(state.scene(), Scene::Collapsing);

        tick(
            &mut state,
            &TickInput {
                pointer_down: Some(DVec2::new(100.0, 400.0)),
                ..Default::default()
            },
        );
        tick(
            &mut state,
            &TickInput {
                pointer_move: Some(DVec2::new(400.0, 400.0)),
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Restarting);
        let epoch = state.clock.epoch;

        // The collapse timer would have fired in here; it must not re-enter
        idle(&mut state, 125);
        assert_eq!(state.scene(), Scene::Restarting);
        assert_eq!(state.clock.epoch, epoch);
    }

    #[test]
    fn test_win_freezes_then_tap_advances_level() {
        let mut state = playing(Tuning::default());
        if let Some(cube) = state.primary_mut() {
            cube.pos = DVec2::new(W / 2.0, 50.0);
        }
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Won);
        assert!(state.objects.iter().all(|o| o.vel == DVec2::ZERO));

        // Frozen while won
        let pos = state.objects[0].pos;
        idle(&mut state, 10);
        assert_eq!(state.objects[0].pos, pos);

        tick(
            &mut state,
            &TickInput {
                tap: true,
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Playing);
        assert_eq!(state.level, Level::Ledges);
        assert_eq!(state.platforms.len(), 2);
    }

    #[test]
    fn test_grown_cube_at_top_does_not_win() {
        let mut state = playing(Tuning::default());
        if let Some(cube) = state.primary_mut() {
            cube.set_size(60.0);
            cube.pos = DVec2::new(W / 2.0, 50.0);
        }
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Playing);
    }

    #[test]
    fn test_tilt_lifts_cube_and_resets() {
        let mut state = playing(Tuning::default());
        let tilt = |beta| TickInput {
            tilt_beta: Some(beta),
            ..Default::default()
        };

        tick(&mut state, &tilt(170.0));
        assert_eq!(state.upward_force, 0.1);
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some(TILT_MESSAGE));

        tick(&mut state, &tilt(20.0));
        assert_eq!(state.upward_force, 0.0);
    }

    #[test]
    fn test_implausible_tilt_ignored() {
        let mut state = playing(Tuning::default());
        for beta in [f64::NAN, f64::INFINITY, 200.0, -181.0] {
            tick(
                &mut state,
                &TickInput {
                    tilt_beta: Some(beta),
                    ..Default::default()
                },
            );
            assert_eq!(state.upward_force, 0.0);
            assert!(state.message.is_none());
        }
    }

    #[test]
    fn test_tilt_floats_cube_to_win() {
        let mut state = playing(Tuning::default());
        tick(
            &mut state,
            &TickInput {
                tilt_beta: Some(-175.0),
                ..Default::default()
            },
        );
        for _ in 0..2000 {
            if state.scene() == Scene::Won {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.scene(), Scene::Won);
    }

    #[test]
    fn test_smash_sequence_returns_to_play() {
        let mut state = playing(Tuning::default());
        if let Some(cube) = state.primary_mut() {
            cube.pos = DVec2::new(W / 2.0, 50.0);
        }
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Won);

        tick(
            &mut state,
            &TickInput {
                tilt_beta: Some(160.0),
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Smashing { anchor_passed: false });
        let epoch = state.clock.epoch;

        let mut texts = Vec::new();
        for _ in 0..2000 {
            if state.scene() == Scene::Playing {
                break;
            }
            tick(&mut state, &TickInput::default());
            if let Some(message) = &state.message {
                if texts.last() != Some(&message.text) {
                    texts.push(message.text.clone());
                }
            }
        }
        assert_eq!(state.scene(), Scene::Playing);
        assert_eq!(state.clock.epoch, epoch + 1);
        let expected: Vec<String> = SMASH_SEQUENCE.iter().map(|(_, t)| t.to_string()).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_held_tilt_win_stays_won_until_flipped_again() {
        let mut state = playing(Tuning::default());
        let tilt = |beta| TickInput {
            tilt_beta: Some(beta),
            ..Default::default()
        };
        for _ in 0..2000 {
            if state.scene() == Scene::Won {
                break;
            }
            tick(&mut state, &tilt(170.0));
        }
        assert_eq!(state.scene(), Scene::Won);
        assert!(!state.tilt_armed);

        // Orientation events keep arriving while the device is held over
        for _ in 0..30 {
            tick(&mut state, &tilt(170.0));
        }
        assert_eq!(state.scene(), Scene::Won);
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some(WIN_MESSAGE));

        tick(&mut state, &tilt(10.0));
        assert_eq!(state.scene(), Scene::Won);
        assert!(state.tilt_armed);

        tick(&mut state, &tilt(170.0));
        assert_eq!(state.scene(), Scene::Smashing { anchor_passed: false });
    }

    #[test]
    fn test_held_tilt_win_still_accepts_tap() {
        let mut state = playing(Tuning::default());
        for _ in 0..2000 {
            if state.scene() == Scene::Won {
                break;
            }
            tick(
                &mut state,
                &TickInput {
                    tilt_beta: Some(-170.0),
                    ..Default::default()
                },
            );
        }
        assert_eq!(state.scene(), Scene::Won);
        tick(
            &mut state,
            &TickInput {
                tap: true,
                tilt_beta: Some(-170.0),
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Playing);
        assert_eq!(state.level, Level::Ledges);
    }

    #[test]
    fn test_restart_rain_returns_fresh_cube_on_same_level() {
        let tuning = Tuning {
            shatter_rule: ShatterRule::BaseMultiple { multiple: 1.1 },
            decor_speed_min: 50.0,
            decor_speed_max: 50.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, Viewport::new(W, H), tuning, Level::Ledges);
        enter_scene(&mut state, Scene::Playing);
        let start = state.start_position();
        drag(&mut state, start, start + DVec2::new(0.0, -200.0));
        assert_eq!(state.scene(), Scene::Collapsing);

        for _ in 0..1000 {
            if state.scene() == Scene::Restarting {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.scene(), Scene::Restarting);
        assert!(!state.decor.is_empty());

        for _ in 0..1000 {
            if state.scene() == Scene::Playing {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.scene(), Scene::Playing);
        assert!(state.decor.is_empty());
        assert_eq!(state.level, Level::Ledges);
        assert_eq!(state.platforms.len(), 2);
        assert_eq!(state.push_count, 0);
        assert_eq!(state.total_distance_pushed, 0.0);
        let cube = state.primary().expect("fresh cube");
        assert_eq!(cube.pos, state.start_position());
        assert_eq!(cube.size, 50.0);
        assert_eq!(cube.vel, DVec2::ZERO);
        assert_eq!(cube.orientation, Orientation::euler(0.0, START_ROTATION_Y));
    }

    #[test]
    fn test_reset_after_win_replays_same_level() {
        let mut state = GameState::new(9, Viewport::new(W, H), Tuning::default(), Level::Ledges);
        enter_scene(&mut state, Scene::Playing);
        if let Some(cube) = state.primary_mut() {
            cube.pos = DVec2::new(W / 2.0, 50.0);
        }
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Won);

        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        assert_eq!(state.scene(), Scene::Playing);
        assert_eq!(state.level, Level::Ledges);
        let cube = state.primary().expect("fresh cube");
        assert_eq!(cube.pos, state.start_position());
        assert_eq!(cube.size, 50.0);
    }

    #[test]
    fn test_resize_moves_ledges_with_viewport() {
        let mut state = GameState::new(4, Viewport::new(W, H), Tuning::default(), Level::Ledges);
        enter_scene(&mut state, Scene::Playing);
        tick(
            &mut state,
            &TickInput {
                resize: Some(Viewport::new(600.0, 400.0)),
                ..Default::default()
            },
        );
        assert_eq!(state.platforms.len(), 2);
        assert_eq!(state.platforms[0].min, DVec2::new(60.0, 220.0));

        // Rain scenes have no level on screen
        let mut state = GameState::new(4, Viewport::new(W, H), Tuning::default(), Level::Ledges);
        enter_scene(&mut state, Scene::Transitioning);
        resize(&mut state, Viewport::new(600.0, 400.0));
        assert!(state.platforms.is_empty());
    }

    #[test]
    fn test_discrete_growth_counts_pushes() {
        let tuning = Tuning {
            growth: GrowthModel::Discrete {
                factor: 1.25,
                min_push: 20.0,
            },
            ..Tuning::default()
        };
        let mut state = playing(tuning);
        let start = state.start_position();

        drag(&mut state, start, start + DVec2::new(5.0, 0.0));
        assert_eq!(state.push_count, 0);
        assert_eq!(state.primary().map(|c| c.size), Some(50.0));

        drag(&mut state, start, start + DVec2::new(100.0, 0.0));
        assert_eq!(state.push_count, 1);
        assert_eq!(state.primary().map(|c| c.size), Some(62.5));
    }

    #[test]
    fn test_push_count_rule_shatters() {
        let tuning = Tuning {
            shatter_rule: ShatterRule::PushCount { pushes: 2 },
            ..Tuning::default()
        };
        let mut state = playing(tuning);
        let start = state.start_position();
        drag(&mut state, start, start + DVec2::new(30.0, 0.0));
        assert_eq!(state.scene(), Scene::Playing);
        drag(&mut state, start, start + DVec2::new(30.0, 0.0));
        idle(&mut state, 1);
        assert_eq!(state.scene(), Scene::Collapsing);
    }

    #[test]
    fn test_tick_without_objects_is_noop() {
        let mut state = playing(Tuning::default());
        state.objects.clear();
        drag(&mut state, DVec2::ZERO, DVec2::new(50.0, 50.0));
        idle(&mut state, 5);
        assert_eq!(state.scene(), Scene::Playing);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_tutorial_intro_messages() {
        let mut state = GameState::new(1, Viewport::new(W, H), Tuning::default(), Level::Tutorial);
        enter_scene(&mut state, Scene::Playing);
        idle(&mut state, 1);
        assert_eq!(
            state.message.as_ref().map(|m| m.text.as_str()),
            Some("Drag to push the block.")
        );
        idle(&mut state, 150);
        assert_eq!(
            state.message.as_ref().map(|m| m.text.as_str()),
            Some("Get it to the top without letting it grow.")
        );
    }

    #[test]
    fn test_resize_keeps_cube_on_screen() {
        let mut state = playing(Tuning::default());
        tick(
            &mut state,
            &TickInput {
                resize: Some(Viewport::new(400.0, 300.0)),
                ..Default::default()
            },
        );
        let cube = state.primary().expect("cube");
        assert!(cube.pos.x <= 400.0 - 25.0 && cube.pos.y <= 300.0 - 25.0);
        assert_eq!(state.target.pos.x, 200.0);
    }

    #[test]
    fn test_determinism() {
        let script = [
            TickInput {
                tap: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        let mut a = state_with(Tuning::default());
        let mut b = state_with(Tuning::default());
        for input in &script {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.decor, b.decor);

        let mut a = playing(Tuning::default());
        let mut b = playing(Tuning::default());
        for s in [&mut a, &mut b] {
            let start = s.start_position();
            drag(s, start, start + DVec2::new(40.0, -5000.0));
            idle(s, 30);
        }
        assert_eq!(a.objects, b.objects);
    }
}
