pub const MAX_LIGHT: u8 = 15;
pub const MAX_SUNLIGHT: u8 = 15;
/// Depth budget of a sky column: full at the top, one less per voxel below.
pub const MAX_SUNLIGHT_REGEN: u8 = 63;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    BlockLight,
    Sunlight,
    SunlightRegen,
}

impl LightChannel {
    pub const ALL: [LightChannel; 3] = [
        LightChannel::BlockLight,
        LightChannel::Sunlight,
        LightChannel::SunlightRegen,
    ];

    #[inline]
    pub const fn max_value(self) -> u8 {
        match self {
            LightChannel::BlockLight => MAX_LIGHT,
            LightChannel::Sunlight => MAX_SUNLIGHT,
            LightChannel::SunlightRegen => MAX_SUNLIGHT_REGEN,
        }
    }

    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            LightChannel::BlockLight => "block",
            LightChannel::Sunlight => "sun",
            LightChannel::SunlightRegen => "regen",
        }
    }
}
