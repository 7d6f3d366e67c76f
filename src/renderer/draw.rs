//! Frame drawing: wireframe and solid polyhedra, title, messages
//!
//! The `Renderer` owns the reusable projection and face-order buffers; the
//! surface is borrowed per call.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::mesh::{CUBE, Polyhedron, glyph};
use super::projector::{Pose, ProjectedVertex, Projection, depth_sort_faces, project_into};
use super::surface::{Color, Surface, colors};
use crate::consts::{TITLE_MAX_SCALE, TITLE_SPACING, TITLE_WORDS};
use crate::levels::LevelBehavior;
use crate::sim::orientation::Orientation;
use crate::sim::scene::Scene;
use crate::sim::state::GameState;

const LINE_WIDTH: f64 = 2.0;

/// How cubes are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderStyle {
    #[default]
    Wireframe,
    Solid,
}

/// Stateful renderer holding scratch buffers between frames
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub style: RenderStyle,
    pub projection: Projection,
    projected: Vec<ProjectedVertex>,
    face_order: Vec<(f64, usize)>,
}

impl Renderer {
    pub fn new(style: RenderStyle, projection: Projection) -> Self {
        Self {
            style,
            projection,
            projected: Vec::with_capacity(CUBE.vertex_count()),
            face_order: Vec::with_capacity(CUBE.faces.len()),
        }
    }

    /// Stroke every edge in a single path; no depth test
    pub fn draw_wireframe(
        &mut self,
        surface: &mut dyn Surface,
        pose: &Pose,
        mesh: &Polyhedron,
        color: Color,
    ) {
        project_into(pose, mesh, self.projection, &mut self.projected);

        surface.set_stroke_color(color.faded(pose.alpha));
        surface.set_line_width(LINE_WIDTH);
        surface.begin_path();
        for &[a, b] in mesh.edges {
            let (v1, v2) = (self.projected[a], self.projected[b]);
            if !(v1.visible && v2.visible) {
                continue;
            }
            surface.move_to(v1.x, v1.y);
            surface.line_to(v2.x, v2.y);
        }
        surface.stroke();
    }

    /// Fill and stroke faces far to near; flat meshes fall back to wireframe
    pub fn draw_solid(&mut self, surface: &mut dyn Surface, pose: &Pose, mesh: &Polyhedron) {
        if !mesh.is_solid() {
            self.draw_wireframe(surface, pose, mesh, colors::SNOW);
            return;
        }

        project_into(pose, mesh, self.projection, &mut self.projected);
        depth_sort_faces(&self.projected, mesh.faces, &mut self.face_order);

        surface.set_fill_color(colors::SNOW_FILL.faded(pose.alpha));
        surface.set_stroke_color(colors::SNOW.faded(pose.alpha));
        surface.set_line_width(LINE_WIDTH);
        for &(_, face_index) in &self.face_order {
            let face = mesh.faces[face_index];
            if face.iter().any(|&i| !self.projected[i].visible) {
                continue;
            }
            let Some((&first, rest)) = face.split_first() else {
                continue;
            };
            surface.begin_path();
            let start = self.projected[first];
            surface.move_to(start.x, start.y);
            for &i in rest {
                let v = self.projected[i];
                surface.line_to(v.x, v.y);
            }
            surface.close_path();
            surface.fill();
            surface.stroke();
        }
    }

    /// Draw a cube in the configured style
    pub fn draw_cube(&mut self, surface: &mut dyn Surface, pose: &Pose) {
        match self.style {
            RenderStyle::Wireframe => self.draw_wireframe(surface, pose, &CUBE, colors::SNOW),
            RenderStyle::Solid => self.draw_solid(surface, pose, &CUBE),
        }
    }

    /// Draw the whole frame for the current scene
    pub fn draw_frame(&mut self, surface: &mut dyn Surface, state: &GameState) {
        let vp = state.viewport;
        surface.clear(vp.width, vp.height);

        match state.scene() {
            Scene::Title => self.draw_title(surface, state),
            Scene::Transitioning | Scene::Restarting => {
                for cube in &state.decor {
                    let pose = Pose::from(cube);
                    self.draw_wireframe(surface, &pose, &CUBE, colors::DECOR);
                }
            }
            Scene::Playing | Scene::Won | Scene::Collapsing | Scene::Smashing { .. } => {
                state.level.draw(state, surface);
                for object in &state.objects {
                    self.draw_cube(surface, &Pose::from(object));
                }
            }
        }

        self.draw_message(surface, state);
    }

    fn draw_title(&mut self, surface: &mut dyn Surface, state: &GameState) {
        let vp = state.viewport;
        let scale = (vp.width / 10.0).min(TITLE_MAX_SCALE);
        let spacing = scale * TITLE_SPACING;
        let total_height = (TITLE_WORDS.len() - 1) as f64 * spacing;
        let orientation = Orientation::euler(state.title.rotation_x, state.title.rotation_y);

        let mut y = vp.height / 2.0 - total_height / 2.0;
        for word in TITLE_WORDS {
            let total_width = (word.chars().count().saturating_sub(1)) as f64 * spacing;
            let mut x = vp.width / 2.0 - total_width / 2.0;
            for letter in word.chars() {
                if let Some(mesh) = glyph(letter) {
                    let pose = Pose {
                        pos: DVec2::new(x, y),
                        size: scale,
                        orientation,
                        alpha: 1.0,
                    };
                    self.draw_wireframe(surface, &pose, mesh, colors::SNOW);
                }
                x += spacing;
            }
            y += spacing;
        }

        surface.set_fill_color(colors::CAPTION);
        surface.fill_text(
            "Tap to begin",
            vp.width / 2.0,
            vp.height / 2.0 + total_height + scale,
            (vp.width / 25.0).min(20.0),
        );
    }

    fn draw_message(&self, surface: &mut dyn Surface, state: &GameState) {
        if let Some(message) = &state.message {
            let vp = state.viewport;
            surface.set_fill_color(colors::MESSAGE);
            surface.fill_text(
                &message.text,
                vp.width / 2.0,
                vp.height / 2.0,
                (vp.width / 30.0).clamp(14.0, 24.0),
            );
        }
    }
}
