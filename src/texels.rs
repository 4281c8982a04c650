use three_d::{CpuTexture, TextureData, Vec2};

use crate::error::{DemoError, Result};


/// Single-channel float image, row-major with row 0 at the top (v = 0)
#[derive(Clone, Debug, PartialEq)]
pub struct Texels {
    width: u32,
    height: u32,
    values: Vec<f32>,
}
impl Texels {
    pub fn new(name: &str, width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || values.len() != (width as usize) * (height as usize) {
            return Err(DemoError::TexelCount {
                name: name.to_string(),
                width,
                height,
                actual: values.len(),
            });
        }
        Ok(Self { width, height, values })
    }

    /// Extracts the first channel of a decoded image, normalised to [0, 1]
    pub fn from_cpu_texture(texture: &CpuTexture) -> Result<Self> {
        let values: Vec<f32> = match &texture.data {
            TextureData::RU8(d) => d.iter().map(|&r| r as f32 / 255.0).collect(),
            TextureData::RgU8(d) => d.iter().map(|t| t[0] as f32 / 255.0).collect(),
            TextureData::RgbU8(d) => d.iter().map(|t| t[0] as f32 / 255.0).collect(),
            TextureData::RgbaU8(d) => d.iter().map(|t| t[0] as f32 / 255.0).collect(),
            TextureData::RF16(d) => d.iter().map(|r| r.to_f32()).collect(),
            TextureData::RgF16(d) => d.iter().map(|t| t[0].to_f32()).collect(),
            TextureData::RgbF16(d) => d.iter().map(|t| t[0].to_f32()).collect(),
            TextureData::RgbaF16(d) => d.iter().map(|t| t[0].to_f32()).collect(),
            TextureData::RF32(d) => d.clone(),
            TextureData::RgF32(d) => d.iter().map(|t| t[0]).collect(),
            TextureData::RgbF32(d) => d.iter().map(|t| t[0]).collect(),
            TextureData::RgbaF32(d) => d.iter().map(|t| t[0]).collect(),
            #[allow(unreachable_patterns)]
            _ => return Err(DemoError::UnsupportedTexels(texture.name.clone())),
        };
        Self::new(&texture.name, texture.width, texture.height, values)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn at(&self, x: u32, y: u32) -> f32 {
        self.values[(y * self.width + x) as usize]
    }

    /// Bilinear lookup with clamp-to-edge addressing
    pub fn sample(&self, uv: Vec2) -> f32 {
        let x = uv.x.clamp(0.0, 1.0) * (self.width - 1) as f32;
        let y = uv.y.clamp(0.0, 1.0) * (self.height - 1) as f32;
        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);

        let top = self.at(x0, y0) * (1.0 - fx) + self.at(x1, y0) * fx;
        let bottom = self.at(x0, y1) * (1.0 - fx) + self.at(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }

    pub fn resampled(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let (width, height) = (width.max(1), height.max(1));
        let step = |i: u32, n: u32| if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };

        let mut values = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                values.push(self.sample(Vec2::new(step(x, width), step(y, height))));
            }
        }
        Self { width, height, values }
    }

    /// Quantised copy, clamped to [0, 255]
    pub fn to_u8(&self) -> Vec<u8> {
        self.values
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use three_d::vec2;

    fn gradient() -> Texels {
        // 0.0 0.5 1.0
        // 1.0 1.0 1.0
        Texels::new("gradient", 3, 2, vec![0.0, 0.5, 1.0, 1.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(Texels::new("bad", 2, 2, vec![0.0; 3]).is_err());
        assert!(Texels::new("empty", 0, 0, vec![]).is_err());
    }

    #[test]
    fn reads_first_channel_of_rgb_images() {
        let texture = CpuTexture {
            name: "rgb".to_string(),
            data: TextureData::RgbU8(vec![[255, 0, 0], [0, 255, 255]]),
            width: 2,
            height: 1,
            ..Default::default()
        };
        let texels = Texels::from_cpu_texture(&texture).unwrap();
        assert_eq!(texels.sample(vec2(0.0, 0.0)), 1.0);
        assert_eq!(texels.sample(vec2(1.0, 0.0)), 0.0);
    }

    #[test]
    fn sampling_hits_texel_centres_at_the_corners() {
        let texels = gradient();
        assert_eq!(texels.sample(vec2(0.0, 0.0)), 0.0);
        assert_eq!(texels.sample(vec2(1.0, 0.0)), 1.0);
        assert_eq!(texels.sample(vec2(0.0, 1.0)), 1.0);
    }

    #[test]
    fn sampling_interpolates_and_clamps() {
        let texels = gradient();
        assert!((texels.sample(vec2(0.25, 0.0)) - 0.25).abs() < 1e-6);
        assert!((texels.sample(vec2(0.0, 0.5)) - 0.5).abs() < 1e-6);
        assert_eq!(texels.sample(vec2(-3.0, -1.0)), 0.0);
        assert_eq!(texels.sample(vec2(7.0, 9.0)), 1.0);
    }

    #[test]
    fn resampling_keeps_the_corners() {
        let texels = gradient().resampled(5, 3);
        assert_eq!((texels.width(), texels.height()), (5, 3));
        assert_eq!(texels.sample(vec2(0.0, 0.0)), 0.0);
        assert_eq!(texels.sample(vec2(1.0, 0.0)), 1.0);
        assert!((texels.sample(vec2(0.5, 0.0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quantises_to_bytes() {
        assert_eq!(gradient().to_u8(), vec![0, 128, 255, 255, 255, 255]);
    }
}
