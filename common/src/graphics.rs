//! Window and GPU device setup

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

/// How the viewer window should be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Wait for vertical blank before presenting
    pub vsync: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Orbit Simulation".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl WindowOptions {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

/// Window plus the surface, device and queue bound to it
pub struct GraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub window: Arc<Window>,
}

impl GraphicsContext {
    pub async fn new(options: &WindowOptions) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(options.title.as_str())
                .with_inner_size(PhysicalSize::new(options.width, options.height))
                .build(&event_loop)
                .context("failed to create window")?,
        );
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let (adapter, device, queue) = request_gpu(&instance, &surface).await?;

        let config = surface_config(
            &surface.get_capabilities(&adapter),
            size,
            options.present_mode(),
        )?;
        surface.configure(&device, &config);
        debug!(
            "surface {:?} {}x{} {:?}",
            config.format, config.width, config.height, config.present_mode
        );

        let context = Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
        };
        Ok((context, event_loop))
    }

    /// Reconfigures the surface; zero-sized (minimized) windows are ignored
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.width as f32 / self.size.height.max(1) as f32
    }
}

async fn request_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow!("no GPU adapter can present to this window"))?;

    let info = adapter.get_info();
    info!("using {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Orbit Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        )
        .await
        .context("failed to create device")?;

    Ok((adapter, device, queue))
}

/// Prefers an sRGB format so body colors are shown as configured
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
    present_mode: wgpu::PresentMode,
) -> Result<wgpu::SurfaceConfiguration> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_selects_present_mode() {
        let options = WindowOptions::default();
        assert_eq!(options.present_mode(), wgpu::PresentMode::AutoVsync);

        let uncapped = WindowOptions {
            vsync: false,
            ..WindowOptions::default()
        };
        assert_eq!(uncapped.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }
}
