/// Orbit camera, perspective projection and pointer picking.
///
/// The camera circles the origin at `distance`, looking at it. World points
/// are rotated by azimuth (Y axis) then elevation (X axis); the camera sits
/// on +Z. NDC is [-1, 1] on both axes with +y pointing down, matching
/// screen space.

use crate::render::animator::FrameItem;

/// Closest depth still drawn
const NEAR: f32 = 0.5;

/// Approximate glyph advance as a fraction of font size
const GLYPH_ASPECT: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Horizontal orbit angle in radians
    pub azimuth: f32,
    /// Vertical orbit angle in radians (positive = looking down)
    pub elevation: f32,
    /// Distance from the camera to the origin
    pub distance: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.15,
            distance: 60.0,
            fov_y: 60.0_f32.to_radians(),
        }
    }
}

/// A world point seen through the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub ndc: [f32; 2],
    /// Distance along the view axis
    pub depth: f32,
    /// NDC units (vertical) per world unit at this depth
    pub ndc_per_unit: f32,
}

impl CameraParams {
    /// Drag in pixels → orbit. Elevation stays clear of the poles.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * 0.008;
        self.elevation = (self.elevation + dy * 0.008).clamp(-1.4, 1.4);
    }

    /// Scroll delta → dolly in/out
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.003)).clamp(5.0, 400.0);
    }

    /// Idle spin around the Y axis
    pub fn auto_rotate(&mut self, dt: f32, speed: f32) {
        self.azimuth = (self.azimuth + dt * speed) % std::f32::consts::TAU;
    }

    /// World → view space (before the +Z camera offset)
    pub fn to_view(&self, world: [f32; 3]) -> [f32; 3] {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let [wx, wy, wz] = world;

        // Azimuth (Y axis) then elevation (X axis)
        let rx = wx * cos_az + wz * sin_az;
        let rz1 = -wx * sin_az + wz * cos_az;
        let ry = wy * cos_el - rz1 * sin_el;
        let rz = wy * sin_el + rz1 * cos_el;
        [rx, ry, rz]
    }

    /// Perspective projection. `None` when the point is behind the near plane.
    pub fn project(&self, world: [f32; 3], aspect: f32) -> Option<Projected> {
        let [vx, vy, vz] = self.to_view(world);
        let depth = self.distance - vz;
        if depth < NEAR {
            return None;
        }
        let tan_half = (self.fov_y * 0.5).tan();
        let ndc_per_unit = 1.0 / (depth * tan_half);
        Some(Projected {
            ndc: [vx * ndc_per_unit / aspect.max(1e-3), -vy * ndc_per_unit],
            depth,
            ndc_per_unit,
        })
    }
}

/// Half extents of a label's screen box in NDC
pub fn label_half_extents(item: &FrameItem<'_>, proj: &Projected, aspect: f32) -> [f32; 2] {
    let size = item.font_size * item.scale;
    let chars = item.label.chars().count().max(1) as f32;
    let half_w = chars * size * GLYPH_ASPECT * 0.5 * proj.ndc_per_unit / aspect.max(1e-3);
    let half_h = size * 0.5 * proj.ndc_per_unit;
    [half_w, half_h]
}

/// Front-most item whose label box contains `pointer_ndc`.
pub fn pick(
    items: &[FrameItem<'_>],
    camera: &CameraParams,
    aspect: f32,
    pointer_ndc: [f32; 2],
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for item in items {
        let Some(proj) = camera.project(item.position, aspect) else {
            continue;
        };
        let [hw, hh] = label_half_extents(item, &proj, aspect);
        let dx = (pointer_ndc[0] - proj.ndc[0]).abs();
        let dy = (pointer_ndc[1] - proj.ndc[1]).abs();
        if dx <= hw && dy <= hh && best.map_or(true, |(_, d)| proj.depth < d) {
            best = Some((item.index, proj.depth));
        }
    }
    best.map(|(i, _)| i)
}
