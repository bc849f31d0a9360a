/// Texture filtering demonstrated by the filtering-modes demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilteringMode {
    #[default]
    Point,
    Trilinear,
    Anisotropic,
}

pub const MAX_ANISOTROPY: u16 = 16;

impl FilteringMode {
    pub const ALL: [FilteringMode; 3] = [
        FilteringMode::Point,
        FilteringMode::Trilinear,
        FilteringMode::Anisotropic,
    ];

    /// Cycles in declaration order, wrapping back to `Point`.
    pub fn next(self) -> Self {
        match self {
            FilteringMode::Point => FilteringMode::Trilinear,
            FilteringMode::Trilinear => FilteringMode::Anisotropic,
            FilteringMode::Anisotropic => FilteringMode::Point,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FilteringMode::Point => "MIN_MAG_MIP_POINT",
            FilteringMode::Trilinear => "MIN_MAG_MIP_LINEAR",
            FilteringMode::Anisotropic => "ANISOTROPIC",
        }
    }

    pub fn descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        let (filter, anisotropy_clamp) = match self {
            FilteringMode::Point => (wgpu::FilterMode::Nearest, 1),
            FilteringMode::Trilinear => (wgpu::FilterMode::Linear, 1),
            // wgpu requires every filter to be linear once anisotropy is above 1
            FilteringMode::Anisotropic => (wgpu::FilterMode::Linear, MAX_ANISOTROPY),
        };

        wgpu::SamplerDescriptor {
            label: Some(self.display_name()),
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: filter,
            anisotropy_clamp,
            ..wrap_descriptor()
        }
    }
}

/// Wrap addressing on all axes, filters left at their defaults.
fn wrap_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        ..Default::default()
    }
}

pub fn trilinear_wrap(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Trilinear Wrap Sampler"),
        ..FilteringMode::Trilinear.descriptor()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode_and_wraps() {
        let mut mode = FilteringMode::default();
        assert_eq!(mode, FilteringMode::Point);
        let mut seen = Vec::new();
        for _ in 0..FilteringMode::ALL.len() {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(seen, FilteringMode::ALL.to_vec());
        assert_eq!(mode, FilteringMode::Point);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, mode) in FilteringMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn descriptors_wrap_and_filter() {
        let point = FilteringMode::Point.descriptor();
        assert_eq!(point.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(point.mipmap_filter, wgpu::FilterMode::Nearest);
        assert_eq!(point.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(point.address_mode_w, wgpu::AddressMode::Repeat);
        assert_eq!(point.anisotropy_clamp, 1);

        let trilinear = FilteringMode::Trilinear.descriptor();
        assert_eq!(trilinear.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(trilinear.mipmap_filter, wgpu::FilterMode::Linear);

        let anisotropic = FilteringMode::Anisotropic.descriptor();
        assert_eq!(anisotropic.anisotropy_clamp, MAX_ANISOTROPY);
        assert_eq!(anisotropic.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(anisotropic.address_mode_v, wgpu::AddressMode::Repeat);
    }

    #[test]
    fn display_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            FilteringMode::ALL.iter().map(|m| m.display_name()).collect();
        assert_eq!(names.len(), 3);
    }
}
