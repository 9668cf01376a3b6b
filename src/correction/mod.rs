// src/correction/mod.rs — Reference-free warm-cast correction
//
// Pipeline over 8-bit Lab planes:
//   1. estimate chroma bias from trimmed midtone statistics
//   2. pull a/b toward mild warm/magenta targets
//   3. split-tone highlights warm+magenta, shadows cool
//   4. uniform chroma gain (zero chroma stays zero)
//   5. soft S-curve on lightness via a 256-entry LUT

pub mod lab;

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::infra::errors::CollapserError;
use lab::{LabPlanes, CHROMA_MAX, CHROMA_MIN};

/// Tuning constants for the correction. Not user-facing.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionParams {
    /// Residual warmth kept on the blue–yellow axis.
    pub target_b: f32,
    /// Slight magenta to avoid an olive cast.
    pub target_a: f32,
    pub strength_b: f32,
    pub strength_a: f32,
    pub warm_highlights: f32,
    pub cool_shadows: f32,
    pub magenta_highlights: f32,
    pub curve_amount: f32,
    pub chroma_gain: f32,
    /// Exclusive bounds on 8-bit lightness for the bias sample.
    pub midtone_bounds: (f32, f32),
    /// Percentile window kept before averaging.
    pub trim_percentiles: (f32, f32),
    /// smoothstep edges over normalised L.
    pub highlight_ramp: (f32, f32),
    /// smoothstep edges over 1 - normalised L.
    pub shadow_ramp: (f32, f32),
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            target_b: 6.0,
            target_a: 2.0,
            strength_b: 0.85,
            strength_a: 0.35,
            warm_highlights: 2.5,
            cool_shadows: -2.0,
            magenta_highlights: 0.8,
            curve_amount: 0.06,
            chroma_gain: 1.06,
            midtone_bounds: (50.0, 200.0),
            trim_percentiles: (10.0, 90.0),
            highlight_ramp: (0.58, 0.86),
            shadow_ramp: (0.45, 0.82),
        }
    }
}

/// Trimmed midtone mean of each chroma channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChromaBias {
    pub a: f32,
    pub b: f32,
}

/// Correct an image with the default tuning.
pub fn correct(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgba8(correct_rgba(&img.to_rgba8(), &CorrectionParams::default()))
}

pub fn correct_rgba(img: &RgbaImage, params: &CorrectionParams) -> RgbaImage {
    let mut planes = LabPlanes::from_rgba(img);
    let bias = estimate_bias(&planes, params);

    let shift_a = params.strength_a * (params.target_a - bias.a);
    let shift_b = params.strength_b * (params.target_b - bias.b);

    let lut = s_curve_lut(params.curve_amount);

    for i in 0..planes.len() {
        let ln = planes.l[i] / 255.0;
        let hmask = smoothstep(ln, params.highlight_ramp.0, params.highlight_ramp.1);
        let smask = smoothstep(1.0 - ln, params.shadow_ramp.0, params.shadow_ramp.1);

        let mut a = planes.a[i] + shift_a;
        let mut b = planes.b[i] + shift_b;

        b += hmask * params.warm_highlights + smask * params.cool_shadows;
        a += hmask * params.magenta_highlights;

        a *= params.chroma_gain;
        b *= params.chroma_gain;

        planes.a[i] = a.clamp(CHROMA_MIN, CHROMA_MAX);
        planes.b[i] = b.clamp(CHROMA_MIN, CHROMA_MAX);
        planes.l[i] = lut[planes.l[i] as u8 as usize] as f32;
    }

    planes.to_rgba()
}

/// Read `src`, correct it, and write PNG to `dst`.
pub fn correct_file(src: &Path, dst: &Path) -> Result<(), CollapserError> {
    let img = image::open(src)?;
    correct(&img).save_with_format(dst, ImageFormat::Png)?;
    Ok(())
}

/// Chroma bias over midtone pixels, each channel trimmed to its percentile window.
///
/// An empty midtone sample yields zero bias on both axes.
pub fn estimate_bias(planes: &LabPlanes, params: &CorrectionParams) -> ChromaBias {
    let (lo, hi) = params.midtone_bounds;
    let mut mid_a = Vec::new();
    let mut mid_b = Vec::new();
    for i in 0..planes.len() {
        let l = planes.l[i];
        if l > lo && l < hi {
            mid_a.push(planes.a[i]);
            mid_b.push(planes.b[i]);
        }
    }

    let (p_lo, p_hi) = params.trim_percentiles;
    ChromaBias {
        a: trimmed_mean(mid_a, p_lo, p_hi).unwrap_or(0.0),
        b: trimmed_mean(mid_b, p_lo, p_hi).unwrap_or(0.0),
    }
}

/// Mean of the values falling inside the [p_lo, p_hi] percentile range.
fn trimmed_mean(mut values: Vec<f32>, p_lo: f32, p_hi: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|x, y| x.total_cmp(y));
    let lo = percentile(&values, p_lo);
    let hi = percentile(&values, p_hi);

    let (sum, count) = values
        .iter()
        .filter(|&&v| v >= lo && v <= hi)
        .fold((0.0f64, 0usize), |(s, c), &v| (s + v as f64, c + 1));
    if count == 0 {
        return None;
    }
    Some((sum / count as f64) as f32)
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f32], pct: f32) -> f32 {
    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f32;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}

/// Hermite 0–1 ramp between `e0` and `e1`.
pub fn smoothstep(x: f32, e0: f32, e1: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0).max(1e-6)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Cubic soft-contrast curve over the full 8-bit lightness range.
///
/// Fixes the midpoint and steepens symmetrically around it.
pub fn s_curve_lut(amount: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let x = i as f32 / 255.0;
        let d = x - 0.5;
        let y = x + amount * d * (1.0 - d * d);
        *slot = (y * 255.0).round_ties_even().clamp(0.0, 255.0) as u8;
    }
    lut
}
