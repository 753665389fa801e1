//! Startup asset table: logical sprite name to GPU texture.
//!
//! Built once before the first frame and passed by reference wherever
//! sprite data is needed, so there is no global image registry. The demo
//! cannot run without both sprites; a missing or undecodable file surfaces
//! as an `Err` that `main` treats as fatal.

use std::collections::HashMap;
use std::sync::Arc;

use flail_core::config::DemoConfig;
use flail_render::{SpritePipeline, Texture};
use glam::Vec2;

pub const SPIKEBALL_ASSET: &str = "spikeball";
pub const WEAPON_ASSET: &str = "weapon";
/// Built-in 1x1 white texture backing untextured quads (lines, crosshair).
pub const WHITE_ASSET: &str = "__white";

pub struct SpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

pub struct AssetTable {
    textures: HashMap<Arc<str>, SpriteTexture>,
}

impl AssetTable {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        config: &DemoConfig,
    ) -> Result<Self, String> {
        let mut textures = HashMap::new();

        for (key, path) in [
            (SPIKEBALL_ASSET, config.spikeball_texture.as_str()),
            (WEAPON_ASSET, config.weapon_texture.as_str()),
        ] {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("Failed to read texture '{path}': {e}"))?;
            let texture = Texture::from_bytes(device, queue, &bytes, path)?;
            log::info!(
                "Loaded sprite '{}' ({}x{}) from {}",
                key,
                texture.size.0,
                texture.size.1,
                path
            );
            let bind_group = pipeline.create_texture_bind_group(device, &texture);
            textures.insert(
                Arc::from(key),
                SpriteTexture {
                    texture,
                    bind_group,
                },
            );
        }

        let white = Texture::from_rgba8(device, queue, &[255, 255, 255, 255], 1, 1, "white");
        let bind_group = pipeline.create_texture_bind_group(device, &white);
        textures.insert(
            Arc::from(WHITE_ASSET),
            SpriteTexture {
                texture: white,
                bind_group,
            },
        );

        Ok(Self { textures })
    }

    pub fn get(&self, key: &str) -> Option<&SpriteTexture> {
        self.textures.get(key)
    }

    /// Natural (unrotated) sprite dimensions in pixels.
    pub fn sprite_size(&self, key: &str) -> Option<Vec2> {
        self.textures
            .get(key)
            .map(|t| Vec2::new(t.texture.size.0 as f32, t.texture.size.1 as f32))
    }
}
