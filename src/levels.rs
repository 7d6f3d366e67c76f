//! Level catalogue
//!
//! Each level decides where the cube starts, where the target band sits and
//! which platforms stand in the way. Dispatch is an exhaustive match on
//! `Level` through the `LevelBehavior` trait.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::consts::START_HEIGHT_FACTOR;
use crate::renderer::surface::{Color, Surface, colors};
use crate::sim::collision::Rect;
use crate::sim::state::{GameState, TargetZone};
use crate::tuning::Tuning;

/// Platform thickness in pixels
const LEDGE_THICKNESS: f64 = 12.0;
/// Growth past this multiple of the start size triggers the tutorial hint
const HINT_GROWTH: f64 = 1.5;

const TUTORIAL_INTRO: &[(u64, &str)] = &[
    (0, "Drag to push the block."),
    (150, "Get it to the top without letting it grow."),
];
const TUTORIAL_HINT: &str = "Heavier with every push... is there another way up?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Level {
    /// Canvas walls only
    #[default]
    Open,
    /// Two ledges between the floor and the target
    Ledges,
    /// Open field with instructions
    Tutorial,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Tutorial, Level::Open, Level::Ledges];

    pub fn name(&self) -> &'static str {
        match self {
            Level::Open => "open",
            Level::Ledges => "ledges",
            Level::Tutorial => "tutorial",
        }
    }

    /// Level played after this one is won
    pub fn next(&self) -> Level {
        match self {
            Level::Tutorial => Level::Open,
            Level::Open => Level::Ledges,
            Level::Ledges => Level::Tutorial,
        }
    }
}

/// What a level hands the controller when play begins
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub start: DVec2,
    pub target: TargetZone,
    pub platforms: Vec<Rect>,
    /// Messages as `(delay_ticks, text)`, scheduled on entry
    pub intro: Vec<(u64, &'static str)>,
}

pub trait LevelBehavior {
    /// Compute the layout for a canvas
    fn setup(&self, viewport: &Viewport, tuning: &Tuning) -> LevelLayout;
    /// Per-frame level logic, run before integration
    fn update(&self, state: &mut GameState);
    /// Draw level furniture behind the cubes
    fn draw(&self, state: &GameState, surface: &mut dyn Surface);
    /// Drop anything the level left behind
    fn cleanup(&self, state: &mut GameState);
}

/// Resting spot of a fresh cube, just above the floor
pub fn start_position(viewport: &Viewport, tuning: &Tuning) -> DVec2 {
    DVec2::new(
        viewport.width / 2.0,
        viewport.height - tuning.start_size * START_HEIGHT_FACTOR,
    )
}

impl LevelBehavior for Level {
    fn setup(&self, viewport: &Viewport, tuning: &Tuning) -> LevelLayout {
        let target = TargetZone::top_band(viewport, tuning.win_zone_height, tuning.start_size);
        let start = start_position(viewport, tuning);

        match self {
            Level::Open => LevelLayout {
                start,
                target,
                platforms: Vec::new(),
                intro: Vec::new(),
            },
            Level::Ledges => {
                let (w, h) = (viewport.width, viewport.height);
                LevelLayout {
                    start,
                    target,
                    platforms: vec![
                        Rect::from_xywh(w * 0.1, h * 0.55, w * 0.3, LEDGE_THICKNESS),
                        Rect::from_xywh(w * 0.6, h * 0.35, w * 0.3, LEDGE_THICKNESS),
                    ],
                    intro: Vec::new(),
                }
            }
            Level::Tutorial => LevelLayout {
                start,
                target,
                platforms: Vec::new(),
                intro: TUTORIAL_INTRO.to_vec(),
            },
        }
    }

    fn update(&self, state: &mut GameState) {
        match self {
            Level::Open | Level::Ledges => {}
            Level::Tutorial => {
                if state.hint_shown {
                    return;
                }
                let grown = state
                    .primary()
                    .is_some_and(|cube| cube.size > cube.base_size * HINT_GROWTH);
                if grown {
                    let ticks = state.tuning.message_ticks * 2;
                    state.show_message(TUTORIAL_HINT, ticks);
                    state.hint_shown = true;
                    log::debug!("Tutorial hint shown at tick {}", state.time_ticks);
                }
            }
        }
    }

    fn draw(&self, state: &GameState, surface: &mut dyn Surface) {
        outline_rect(surface, &state.target.rect(), colors::TARGET);

        match self {
            Level::Open | Level::Tutorial => {}
            Level::Ledges => {
                surface.set_fill_color(colors::PLATFORM);
                for platform in &state.platforms {
                    surface.begin_path();
                    surface.move_to(platform.min.x, platform.min.y);
                    surface.line_to(platform.max.x, platform.min.y);
                    surface.line_to(platform.max.x, platform.max.y);
                    surface.line_to(platform.min.x, platform.max.y);
                    surface.close_path();
                    surface.fill();
                }
            }
        }
    }

    fn cleanup(&self, state: &mut GameState) {
        state.message = None;
        state.hint_shown = false;
        state.platforms.clear();
    }
}

fn outline_rect(surface: &mut dyn Surface, rect: &Rect, color: Color) {
    surface.set_stroke_color(color);
    surface.set_line_width(1.0);
    surface.begin_path();
    surface.move_to(rect.min.x, rect.min.y);
    surface.line_to(rect.max.x, rect.min.y);
    surface.line_to(rect.max.x, rect.max.y);
    surface.line_to(rect.min.x, rect.max.y);
    surface.line_to(rect.min.x, rect.min.y);
    surface.stroke();
}
