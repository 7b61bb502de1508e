//! Per-frame command encoding.
//!
//! [`RenderPassBuilder`] describes the attachments of a pass and
//! [`FrameEncoder`] owns the acquired surface texture and command encoder
//! for one frame, submitting and presenting both in [`FrameEncoder::submit`].

use crate::depth::DepthBuffer;

/// Opaque black, the color behind the background quad.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

#[derive(Debug)]
struct DepthAttachment<'a> {
    view: &'a wgpu::TextureView,
    clear_value: f32,
}

/// Fluent description of a render pass targeting the frame's surface view.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth: Option<DepthAttachment<'a>>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_BLACK,
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach `depth`, cleared to the reverse-Z far value.
    pub fn depth(mut self, depth: &'a DepthBuffer) -> Self {
        self.depth = Some(DepthAttachment {
            view: &depth.view,
            clear_value: DepthBuffer::CLEAR_VALUE,
        });
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and surface texture.
///
/// Dropping it without calling [`submit`](Self::submit) discards the frame.
#[must_use = "a frame is only shown once it is submitted"]
pub struct FrameEncoder<'q> {
    encoder: wgpu::CommandEncoder,
    queue: &'q wgpu::Queue,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orrery-frame"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    /// Begin a pass drawing into this frame's surface view.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder<'a>,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.queue
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn submit(self) {
        self.queue.submit(std::iter::once(self.encoder.finish()));
        self.surface_texture.present();
    }
}
