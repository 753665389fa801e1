//! CPU-side quad mesh for one frame.
//!
//! Everything the demo draws is a textured quad: the two sprites are
//! rotated quads, and every line (crosshair, chain) is a thin quad over the
//! 1x1 white texture. Quads are pushed in paint order; consecutive quads
//! sharing a texture collapse into a single draw call.

use std::sync::Arc;

use flail_core::geometry::rotate_screen;
use flail_render::SpriteVertex;
use glam::Vec2;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct SceneMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl SceneMesh {
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
            draw_calls: Vec::with_capacity(4),
        }
    }

    /// Sprite quad of `size`, rotated by `angle_deg` (visual CCW) about its
    /// own center, placed at `center`. `mirrored` flips the V texture axis,
    /// which is how the weapon's left-facing variant is realized.
    pub fn push_sprite(
        &mut self,
        texture_key: &str,
        center: Vec2,
        size: Vec2,
        angle_deg: f32,
        mirrored: bool,
        color: [f32; 4],
    ) {
        let half = size * 0.5;
        // Top-left, top-right, bottom-right, bottom-left in y-down space.
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
        let (v_top, v_bottom) = if mirrored { (1.0, 0.0) } else { (0.0, 1.0) };
        let uvs = [
            [0.0, v_top],
            [1.0, v_top],
            [1.0, v_bottom],
            [0.0, v_bottom],
        ];

        let base_index = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            let position = center + rotate_screen(*corner, angle_deg);
            self.vertices.push(SpriteVertex {
                position: [position.x, position.y],
                tex_coords: uv,
                color,
            });
        }
        self.push_quad_indices(base_index, texture_key);
    }

    /// Line segment as a thin quad of `width` centered on the segment.
    /// Degenerate segments are dropped.
    pub fn push_line(
        &mut self,
        texture_key: &str,
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    ) {
        let dir = to - from;
        let len = dir.length();
        if len <= f32::EPSILON {
            return;
        }
        let normal = Vec2::new(-dir.y, dir.x) * (width * 0.5 / len);

        let base_index = self.vertices.len() as u32;
        for (position, uv) in [
            (from - normal, [0.0, 0.0]),
            (to - normal, [1.0, 0.0]),
            (to + normal, [1.0, 1.0]),
            (from + normal, [0.0, 1.0]),
        ] {
            self.vertices.push(SpriteVertex {
                position: [position.x, position.y],
                tex_coords: uv,
                color,
            });
        }
        self.push_quad_indices(base_index, texture_key);
    }

    fn push_quad_indices(&mut self, base_index: u32, texture_key: &str) {
        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
        push_draw_call(&mut self.draw_calls, Arc::from(texture_key), draw_start, 6);
    }
}

/// Append a draw call, merging with the previous one when the texture
/// matches and the index ranges are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn positions(mesh: &SceneMesh) -> Vec<Vec2> {
        mesh.vertices
            .iter()
            .map(|v| Vec2::new(v.position[0], v.position[1]))
            .collect()
    }

    #[test]
    fn unrotated_sprite_is_axis_aligned_around_center() {
        let mut mesh = SceneMesh::with_capacity(1);
        mesh.push_sprite("ball", Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), 0.0, false, WHITE);

        let p = positions(&mesh);
        assert_eq!(p[0], Vec2::new(8.0, 17.0));
        assert_eq!(p[1], Vec2::new(12.0, 17.0));
        assert_eq!(p[2], Vec2::new(12.0, 23.0));
        assert_eq!(p[3], Vec2::new(8.0, 23.0));
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn rotation_spins_corners_visually_ccw() {
        let mut mesh = SceneMesh::with_capacity(1);
        mesh.push_sprite("ball", Vec2::ZERO, Vec2::new(2.0, 2.0), 90.0, false, WHITE);

        // Top-left corner (-1,-1) swings a quarter turn CCW to bottom-left (-1,1).
        let p = positions(&mesh);
        assert!((p[0] - Vec2::new(-1.0, 1.0)).length() < 1e-4, "got {:?}", p[0]);
    }

    #[test]
    fn mirroring_flips_only_the_v_axis() {
        let mut mesh = SceneMesh::with_capacity(2);
        mesh.push_sprite("gun", Vec2::ZERO, Vec2::new(2.0, 2.0), 0.0, false, WHITE);
        mesh.push_sprite("gun", Vec2::ZERO, Vec2::new(2.0, 2.0), 0.0, true, WHITE);

        for i in 0..4 {
            let plain = mesh.vertices[i];
            let flipped = mesh.vertices[i + 4];
            assert_eq!(plain.position, flipped.position);
            assert_eq!(plain.tex_coords[0], flipped.tex_coords[0]);
            assert_eq!(plain.tex_coords[1], 1.0 - flipped.tex_coords[1]);
        }
    }

    #[test]
    fn line_quad_spans_width_across_the_segment() {
        let mut mesh = SceneMesh::with_capacity(1);
        mesh.push_line("white", Vec2::new(0.0, 54.0), Vec2::new(192.0, 54.0), 3.0, WHITE);

        let p = positions(&mesh);
        assert_eq!(p.len(), 4);
        let ys: Vec<f32> = p.iter().map(|v| v.y).collect();
        assert!(ys.iter().any(|&y| (y - 52.5).abs() < 1e-4));
        assert!(ys.iter().any(|&y| (y - 55.5).abs() < 1e-4));
    }

    #[test]
    fn degenerate_line_pushes_nothing() {
        let mut mesh = SceneMesh::with_capacity(1);
        mesh.push_line("white", Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 3.0, WHITE);
        assert!(mesh.vertices.is_empty());
        assert!(mesh.draw_calls.is_empty());
    }

    #[test]
    fn consecutive_quads_with_same_texture_merge() {
        let mut mesh = SceneMesh::with_capacity(3);
        mesh.push_line("white", Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, WHITE);
        mesh.push_line("white", Vec2::ZERO, Vec2::new(0.0, 10.0), 1.0, WHITE);
        mesh.push_sprite("ball", Vec2::ZERO, Vec2::new(2.0, 2.0), 0.0, false, WHITE);

        assert_eq!(mesh.draw_calls.len(), 2);
        assert_eq!(mesh.draw_calls[0].index_count, 12);
        assert_eq!(&*mesh.draw_calls[1].texture_key, "ball");
        assert_eq!(mesh.draw_calls[1].index_start, 12);
    }
}
