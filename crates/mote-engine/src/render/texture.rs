//! Batch texture loading.
//!
//! The batch samples one RGBA texture. It is decoded on the CPU with `image`
//! and uploaded once as `Rgba8UnormSrgb`.

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

/// Side length of the generated circle mask.
pub const DEFAULT_MASK_SIZE: u32 = 64;

const BYTES_PER_TEXEL: u32 = 4;

/// Where the batch texture comes from.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// Image file decoded by extension (png, jpeg, bmp).
    File(PathBuf),
    /// Already decoded pixels.
    Image(RgbaImage),
}

impl Default for TextureSource {
    fn default() -> Self {
        TextureSource::Image(circle_mask(DEFAULT_MASK_SIZE))
    }
}

impl TextureSource {
    /// Decodes the source into RGBA8 pixels.
    pub fn decode(&self) -> Result<Cow<'_, RgbaImage>> {
        let image = match self {
            TextureSource::File(path) => Cow::Owned(
                image::open(path)
                    .with_context(|| format!("failed to load texture {}", path.display()))?
                    .to_rgba8(),
            ),
            TextureSource::Image(image) => Cow::Borrowed(image),
        };

        anyhow::ensure!(
            image.width() > 0 && image.height() > 0,
            "texture has zero size ({}x{})",
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

/// White square with an anti-aliased opaque disk inscribed in it.
///
/// Alpha falls off over one texel at the rim; everything outside is fully
/// transparent.
pub fn circle_mask(size: u32) -> RgbaImage {
    let center = size as f32 * 0.5;
    let radius = center;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
        Rgba([255, 255, 255, (coverage * 255.0).round() as u8])
    })
}

/// A sampled texture on the GPU.
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// Decodes `source` and uploads it as an sRGB texture.
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    source: &TextureSource,
) -> Result<GpuTexture> {
    let image = source.decode()?;
    let (width, height) = image.dimensions();
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("mote batch texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        copy_layout(width, height),
        extent,
    );

    log::debug!("batch texture uploaded: {width}x{height}");

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Ok(GpuTexture { texture, view })
}

fn copy_layout(width: u32, height: u32) -> wgpu::TexelCopyBufferLayout {
    wgpu::TexelCopyBufferLayout {
        offset: 0,
        bytes_per_row: Some(width * BYTES_PER_TEXEL),
        rows_per_image: Some(height),
    }
}
