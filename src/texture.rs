//! Image loading, CPU mip generation and upload to sampled GPU textures.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::AssetError;

pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    let reader = image::ImageReader::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = reader.with_guessed_format().map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgba8())
}

pub fn solid(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba(color))
}

pub fn checkerboard(size: u32, cells: u32, even: [u8; 4], odd: [u8; 4]) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba(even)
        } else {
            Rgba(odd)
        }
    })
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Level 0 is `image` itself, each following level halves both sides down to 1x1.
pub fn mip_chain(image: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(image.width(), image.height());
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(image.clone());
    for level in 1..levels {
        let width = (image.width() >> level).max(1);
        let height = (image.height() >> level).max(1);
        let previous = &chain[level as usize - 1];
        chain.push(imageops::resize(previous, width, height, FilterType::Triangle));
    }
    chain
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Colour maps; sampled values are linearised by the GPU.
    Srgb,
    /// Data maps such as specular intensity.
    Linear,
}

impl ColorSpace {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &RgbaImage,
        color_space: ColorSpace,
    ) -> Self {
        let chain = mip_chain(image);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width(),
                height: image.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: chain.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in chain.iter().enumerate() {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                mip.as_raw(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * mip.width()),
                    rows_per_image: Some(mip.height()),
                },
                wgpu::Extent3d {
                    width: mip.width(),
                    height: mip.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!(
            "Created texture '{label}' ({}x{}, {} mips)",
            image.width(),
            image.height(),
            chain.len()
        );
        Texture { texture, view }
    }

    /// Loads `path`, or uploads `fallback` with a warning when the file is missing or unreadable.
    pub fn load_or(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        fallback: impl FnOnce() -> RgbaImage,
        color_space: ColorSpace,
    ) -> Self {
        let label = path.display().to_string();
        let image = match load_rgba(path) {
            Ok(image) => {
                log::info!("Loaded {label}");
                image
            }
            Err(err) => {
                log::warn!("{err}; using fallback texture");
                fallback()
            }
        };
        Texture::from_image(device, queue, &label, &image, color_space)
    }
}
