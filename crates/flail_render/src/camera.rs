use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed-resolution screen-space camera. Maps the logical surface
/// (0,0 top-left, y down) onto the full viewport regardless of the window's
/// physical size, so the window is just an integer-scaled view of the
/// 192x108 surface.
pub struct ScreenCamera {
    pub virtual_width: f32,
    pub virtual_height: f32,
}

impl ScreenCamera {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        Self {
            virtual_width,
            virtual_height,
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        // Top and bottom are swapped relative to the usual orthographic
        // setup: that flips y so screen space reads top-down.
        let proj = Mat4::orthographic_rh(
            0.0,
            self.virtual_width,
            self.virtual_height,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn top_left_maps_to_upper_left_ndc() {
        let camera = ScreenCamera::new(192.0, 108.0);
        let proj = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);

        let top_left = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x - -1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);

        let bottom_right = proj * Vec4::new(192.0, 108.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y - -1.0).abs() < 1e-5);
    }

    #[test]
    fn screen_center_maps_to_ndc_origin() {
        let camera = ScreenCamera::new(192.0, 108.0);
        let proj = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let center = proj * Vec4::new(96.0, 54.0, 0.0, 1.0);
        assert!(center.x.abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);
    }
}
