pub mod animate;
pub mod camera;
pub mod config;
pub mod constants;
pub mod item;
pub mod layout;
pub mod quality;
pub mod scene;

pub static DECOR_WGSL: &str = include_str!("../shaders/decor.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use animate::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use item::*;
pub use layout::*;
pub use quality::*;
pub use scene::*;
