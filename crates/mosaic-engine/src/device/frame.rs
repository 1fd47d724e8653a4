/// A single acquired swapchain frame.
///
/// Holding the surface texture blocks acquisition of the next one, so the
/// frame is submitted as soon as the scene is recorded.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
