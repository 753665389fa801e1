pub mod camera;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;

pub use camera::{CameraUniform, ScreenCamera};
pub use gpu_context::GpuContext;
pub use sprite_pipeline::{SpritePipeline, SpriteVertex};
pub use texture::Texture;
