//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and color. Positions are logical pixels
/// (800x600, y down) until the pipeline maps them to clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Lighten (positive) or darken (negative) a color, keeping alpha
pub fn shade(color: [f32; 4], amount: f32) -> [f32; 4] {
    let f = |c: f32| (c + amount).clamp(0.0, 1.0);
    [f(color[0]), f(color[1]), f(color[2]), color[3]]
}

/// Colors for game elements
pub mod colors {
    pub const STONE: [f32; 4] = [0.42, 0.38, 0.36, 1.0];
    pub const ICE: [f32; 4] = [0.62, 0.85, 0.95, 1.0];
    pub const CRUMBLING: [f32; 4] = [0.55, 0.40, 0.25, 1.0];
    pub const GHOST: [f32; 4] = [0.55, 0.45, 0.75, 1.0];
    pub const LAVA: [f32; 4] = [0.95, 0.35, 0.05, 1.0];
    pub const LAVA_GLOW: [f32; 4] = [1.0, 0.85, 0.2, 1.0];

    pub const STEEL: [f32; 4] = [0.78, 0.80, 0.85, 1.0];
    pub const CHAIN: [f32; 4] = [0.45, 0.45, 0.48, 1.0];
    pub const FREEZE: [f32; 4] = [0.55, 0.80, 1.0, 0.28];
    pub const FIRE_CORE: [f32; 4] = [1.0, 0.9, 0.3, 0.95];
    pub const FIRE_EDGE: [f32; 4] = [0.9, 0.2, 0.0, 0.0];
    pub const FIRE_NOZZLE: [f32; 4] = [0.3, 0.25, 0.25, 1.0];

    pub const PLAYER_BODY: [f32; 4] = [0.25, 0.45, 0.85, 1.0];
    pub const PLAYER_ARMOR: [f32; 4] = [0.75, 0.75, 0.80, 1.0];
    pub const PLAYER_SKIN: [f32; 4] = [0.95, 0.78, 0.62, 1.0];
    pub const PLAYER_LEGS: [f32; 4] = [0.30, 0.22, 0.15, 1.0];
    pub const PLAYER_DEAD: [f32; 4] = [1.0, 0.15, 0.1, 1.0];

    pub const GOAL: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const GOAL_HALO: [f32; 4] = [1.0, 0.95, 0.5, 0.5];
    pub const GOAL_GLOW: [f32; 4] = [1.0, 0.95, 0.5, 0.0];

    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
}
