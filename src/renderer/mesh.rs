//! Static polyhedra: the unit cube and the title letter glyphs
//!
//! Vertices live in [-1, 1]³ model space; the projector scales them by half the
//! object's size. Assets are `'static` and never mutated.

use glam::DVec3;

/// Immutable wireframe/solid shape shared by every instance
#[derive(Debug)]
pub struct Polyhedron {
    pub vertices: &'static [DVec3],
    pub edges: &'static [[usize; 2]],
    /// Faces as vertex index loops (empty for flat glyphs)
    pub faces: &'static [&'static [usize]],
}

impl Polyhedron {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_solid(&self) -> bool {
        !self.faces.is_empty()
    }
}

const fn v(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x, y, z)
}

pub static CUBE: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, -1.0, -1.0),
        v(1.0, -1.0, -1.0),
        v(1.0, 1.0, -1.0),
        v(-1.0, 1.0, -1.0),
        v(-1.0, -1.0, 1.0),
        v(1.0, -1.0, 1.0),
        v(1.0, 1.0, 1.0),
        v(-1.0, 1.0, 1.0),
    ],
    edges: &[
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ],
    faces: &[
        &[0, 1, 2, 3],
        &[4, 5, 6, 7],
        &[0, 1, 5, 4],
        &[3, 2, 6, 7],
        &[0, 3, 7, 4],
        &[1, 2, 6, 5],
    ],
};

// Letter glyphs are flat (z = 0) line drawings.

static GLYPH_S: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, 1.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(-1.0, 0.0, 0.0),
        v(1.0, 0.0, 0.0),
        v(-1.0, -1.0, 0.0),
        v(1.0, -1.0, 0.0),
    ],
    edges: &[[0, 1], [0, 2], [2, 3], [3, 5], [4, 5]],
    faces: &[],
};

static GLYPH_N: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, 1.0, 0.0),
        v(-1.0, -1.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(1.0, -1.0, 0.0),
    ],
    edges: &[[0, 1], [0, 3], [2, 3]],
    faces: &[],
};

static GLYPH_O: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, 1.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(-1.0, -1.0, 0.0),
        v(1.0, -1.0, 0.0),
    ],
    edges: &[[0, 1], [1, 3], [3, 2], [2, 0]],
    faces: &[],
};

static GLYPH_W: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, 1.0, 0.0),
        v(-0.5, -1.0, 0.0),
        v(0.0, 0.0, 0.0),
        v(0.5, -1.0, 0.0),
        v(1.0, 1.0, 0.0),
    ],
    edges: &[[0, 1], [1, 2], [2, 3], [3, 4]],
    faces: &[],
};

static GLYPH_B: Polyhedron = Polyhedron {
    vertices: &[
        v(-0.8, 1.0, 0.0),
        v(0.8, 0.8, 0.0),
        v(0.8, 0.0, 0.0),
        v(-0.8, 0.0, 0.0),
        v(0.8, -0.8, 0.0),
        v(-0.8, -1.0, 0.0),
    ],
    edges: &[[0, 1], [1, 2], [2, 3], [0, 3], [2, 4], [4, 5], [5, 3]],
    faces: &[],
};

static GLYPH_L: Polyhedron = Polyhedron {
    vertices: &[v(-1.0, 1.0, 0.0), v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0)],
    edges: &[[0, 1], [1, 2]],
    faces: &[],
};

static GLYPH_C: Polyhedron = Polyhedron {
    vertices: &[
        v(1.0, 1.0, 0.0),
        v(-1.0, 1.0, 0.0),
        v(-1.0, -1.0, 0.0),
        v(1.0, -1.0, 0.0),
    ],
    edges: &[[0, 1], [1, 2], [2, 3]],
    faces: &[],
};

static GLYPH_K: Polyhedron = Polyhedron {
    vertices: &[
        v(-1.0, 1.0, 0.0),
        v(-1.0, -1.0, 0.0),
        v(-1.0, 0.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(1.0, -1.0, 0.0),
    ],
    edges: &[[0, 1], [2, 3], [2, 4]],
    faces: &[],
};

/// Glyph for an upper-case title letter, if one exists
pub fn glyph(letter: char) -> Option<&'static Polyhedron> {
    match letter.to_ascii_uppercase() {
        'S' => Some(&GLYPH_S),
        'N' => Some(&GLYPH_N),
        'O' => Some(&GLYPH_O),
        'W' => Some(&GLYPH_W),
        'B' => Some(&GLYPH_B),
        'L' => Some(&GLYPH_L),
        'C' => Some(&GLYPH_C),
        'K' => Some(&GLYPH_K),
        _ => None,
    }
}
