/// Straight-alpha RGBA8 pixel, channel order `[r, g, b, a]`.
pub type Rgba8 = [u8; 4];

/// Fully transparent black; the value of every unwritten output pixel.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Saturate an integer channel value into `[0, 255]`.
pub fn clamp(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight(px: Rgba8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        let [r, g, b, a] = px;
        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert back to straight alpha. Colour is lost for fully transparent pixels.
    pub fn to_straight(self) -> Rgba8 {
        if self.a == 0 {
            return TRANSPARENT;
        }
        let a = u32::from(self.a);
        let unpremul = |c: u8| (((u32::from(c) * 255) + a / 2) / a).min(255) as u8;
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(v: [u8; 4]) -> Self {
        Self {
            r: v[0],
            g: v[1],
            b: v[2],
            a: v[3],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
