use crate::MAX_LIGHT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Opacity {
    #[default]
    Transparent,
    /// Lets light through but shades the column below it from the sky.
    Translucent,
    Opaque,
}

/// The part of a voxel the lighting code cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub opacity: Opacity,
    pub luminance: u8,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        opacity: Opacity::Transparent,
        luminance: 0,
    };
    pub const STONE: Voxel = Voxel {
        opacity: Opacity::Opaque,
        luminance: 0,
    };
    pub const GLASS: Voxel = Voxel {
        opacity: Opacity::Translucent,
        luminance: 0,
    };

    #[inline]
    pub const fn torch(level: u8) -> Voxel {
        Voxel {
            opacity: Opacity::Transparent,
            luminance: if level > MAX_LIGHT { MAX_LIGHT } else { level },
        }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        matches!(self.opacity, Opacity::Opaque)
    }

    #[inline]
    pub const fn casts_shadow(self) -> bool {
        !matches!(self.opacity, Opacity::Transparent)
    }
}
