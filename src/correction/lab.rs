// src/correction/lab.rs — 8-bit Lab planes
//
// Lightness is scaled to 0..=255 and chroma is centred on zero, the same
// quantisation an 8-bit Lab image carries. Alpha rides along untouched.

use image::{Rgba, RgbaImage};
use palette::white_point::D65;
use palette::{IntoColor, Lab, LinSrgb, Srgb};

type LabD65 = Lab<D65, f32>;

/// CIE L* (0..100) to the 8-bit lightness scale.
pub const L_SCALE: f32 = 255.0 / 100.0;

/// Chroma range representable around the 128 offset of an 8-bit channel.
pub const CHROMA_MIN: f32 = -128.0;
pub const CHROMA_MAX: f32 = 127.0;

#[derive(Debug, Clone)]
pub struct LabPlanes {
    pub width: u32,
    pub height: u32,
    pub l: Vec<f32>,
    pub a: Vec<f32>,
    pub b: Vec<f32>,
    pub alpha: Vec<u8>,
}

impl LabPlanes {
    pub fn from_rgba(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let n = (width as usize) * (height as usize);
        let mut planes = Self {
            width,
            height,
            l: Vec::with_capacity(n),
            a: Vec::with_capacity(n),
            b: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
        };

        for px in img.pixels() {
            let lab = rgb8_to_lab(px.0[0], px.0[1], px.0[2]);
            planes.l.push((lab.l * L_SCALE).round().clamp(0.0, 255.0));
            planes.a.push(lab.a.round().clamp(CHROMA_MIN, CHROMA_MAX));
            planes.b.push(lab.b.round().clamp(CHROMA_MIN, CHROMA_MAX));
            planes.alpha.push(px.0[3]);
        }
        planes
    }

    /// Recompose into RGBA. Channels are clamped to their 8-bit ranges first.
    pub fn to_rgba(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width, self.height);
        for (i, px) in out.pixels_mut().enumerate() {
            let l = self.l[i].clamp(0.0, 255.0) / L_SCALE;
            let a = self.a[i].clamp(CHROMA_MIN, CHROMA_MAX);
            let b = self.b[i].clamp(CHROMA_MIN, CHROMA_MAX);
            let [r, g, bl] = lab_to_rgb8(LabD65::new(l, a, b));
            *px = Rgba([r, g, bl, self.alpha[i]]);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.l.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }
}

fn rgb8_to_lab(r: u8, g: u8, b: u8) -> LabD65 {
    let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let lin: LinSrgb<f32> = srgb.into_linear();
    lin.into_color()
}

fn lab_to_rgb8(lab: LabD65) -> [u8; 3] {
    let lin: LinSrgb<f32> = lab.into_color();
    let srgb: Srgb<f32> = Srgb::from_linear(lin);
    [
        (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_has_zero_chroma() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
        let planes = LabPlanes::from_rgba(&img);
        assert!(planes.a.iter().all(|&a| a == 0.0));
        assert!(planes.b.iter().all(|&b| b == 0.0));
        // sRGB 128 is L* ~53.6
        assert!((planes.l[0] - 137.0).abs() <= 1.0, "l = {}", planes.l[0]);
    }

    #[test]
    fn test_black_and_white_extremes() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let planes = LabPlanes::from_rgba(&img);
        assert_eq!(planes.l[0], 0.0);
        assert_eq!(planes.l[1], 255.0);
    }

    #[test]
    fn test_yellow_is_positive_b() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([220, 200, 80, 255]));
        let planes = LabPlanes::from_rgba(&img);
        assert!(planes.b[0] > 30.0);
    }

    #[test]
    fn test_roundtrip_close() {
        let colors = [[200u8, 40, 40], [30, 160, 90], [90, 90, 220], [250, 240, 230]];
        let mut img = RgbaImage::new(colors.len() as u32, 1);
        for (x, c) in colors.iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba([c[0], c[1], c[2], 200]));
        }
        let back = LabPlanes::from_rgba(&img).to_rgba();
        for (orig, got) in img.pixels().zip(back.pixels()) {
            for ch in 0..3 {
                let diff = (orig.0[ch] as i32 - got.0[ch] as i32).abs();
                assert!(diff <= 5, "{:?} vs {:?}", orig, got);
            }
            assert_eq!(orig.0[3], got.0[3]);
        }
    }
}
