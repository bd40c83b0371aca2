//! Layout and alpha blending math for watermark application.
//!
//! The watermark is stretched to the full height of the base image, centered
//! horizontally on a transparent layer, faded by the opacity factor and then
//! blended with the standard "over" operator:
//! `out_a = src_a + dst_a * (1 - src_a)`
//! `out_c = (src_c * src_a + dst_c * dst_a * (1 - src_a)) / out_a`

use image::{imageops, RgbaImage};

use crate::error::{Error, Result};
use crate::opacity::Opacity;

/// Compute watermark dimensions that fill `target_height` while keeping the
/// watermark's aspect ratio.
///
/// The width is rounded to the nearest pixel and never drops below 1.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the watermark has a zero dimension.
pub fn fit_to_height(wm_width: u32, wm_height: u32, target_height: u32) -> Result<(u32, u32)> {
    if wm_width == 0 || wm_height == 0 {
        return Err(Error::EmptyImage {
            width: wm_width,
            height: wm_height,
        });
    }

    let scale = f64::from(target_height) / f64::from(wm_height);
    let width = (f64::from(wm_width) * scale).round();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = width.clamp(1.0, f64::from(u32::MAX)) as u32;

    Ok((width, target_height))
}

/// Left offset that centers an overlay of `overlay_width` on a base of
/// `base_width`. Negative when the overlay is wider than the base.
#[must_use]
pub fn center_offset(base_width: u32, overlay_width: u32) -> i64 {
    (i64::from(base_width) - i64::from(overlay_width)).div_euclid(2)
}

/// Build the watermark layer: a transparent canvas of `width` x `height` with
/// `watermark` pasted horizontally centered at the top, and every alpha value
/// scaled by `opacity`.
///
/// `watermark` is expected to be already resized. Parts that fall outside the
/// canvas are clipped.
#[must_use]
pub fn build_layer(watermark: &RgbaImage, width: u32, height: u32, opacity: Opacity) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    let x = center_offset(width, watermark.width());
    imageops::replace(&mut layer, watermark, x, 0);

    for px in layer.pixels_mut() {
        px[3] = opacity.scale_alpha(px[3]);
    }

    layer
}

/// Composite `layer` over `base` in-place using straight (non-premultiplied)
/// alpha.
///
/// Pixels where the layer is fully transparent are left untouched. If the two
/// images differ in size only the overlapping region is blended.
pub fn composite_over(base: &mut RgbaImage, layer: &RgbaImage) {
    let w = base.width().min(layer.width());
    let h = base.height().min(layer.height());

    for y in 0..h {
        for x in 0..w {
            let src = layer.get_pixel(x, y);
            if src[3] == 0 {
                continue;
            }

            let dst = base.get_pixel_mut(x, y);
            if src[3] == u8::MAX {
                *dst = *src;
                continue;
            }

            let src_a = f32::from(src[3]) / 255.0;
            let dst_a = f32::from(dst[3]) / 255.0;
            let dst_weight = dst_a * (1.0 - src_a);
            let out_a = src_a + dst_weight;

            for ch in 0..3 {
                let blended =
                    (f32::from(src[ch]) * src_a + f32::from(dst[ch]) * dst_weight) / out_a;
                dst[ch] = to_channel(blended);
            }
            dst[3] = to_channel(out_a * 255.0);
        }
    }
}

fn to_channel(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.round().clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn fit_to_height_preserves_aspect_ratio() {
        assert_eq!(fit_to_height(100, 50, 200).unwrap(), (400, 200));
        assert_eq!(fit_to_height(50, 100, 30).unwrap(), (15, 30));
        // 3 * 10 / 7 = 4.28 -> 4
        assert_eq!(fit_to_height(3, 7, 10).unwrap(), (4, 10));
        // 5 * 10 / 4 = 12.5 -> 13
        assert_eq!(fit_to_height(5, 4, 10).unwrap(), (13, 10));
    }

    #[test]
    fn fit_to_height_never_collapses_width() {
        assert_eq!(fit_to_height(1, 1000, 10).unwrap(), (1, 10));
    }

    #[test]
    fn fit_to_height_rejects_empty_watermark() {
        assert!(matches!(
            fit_to_height(0, 10, 10),
            Err(Error::EmptyImage {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn center_offset_floors() {
        assert_eq!(center_offset(100, 40), 30);
        assert_eq!(center_offset(101, 40), 30);
        assert_eq!(center_offset(40, 40), 0);
        assert_eq!(center_offset(40, 45), -3);
    }

    #[test]
    fn build_layer_centers_and_fades() {
        let wm = solid(4, 6, [255, 0, 0, 200]);
        let layer = build_layer(&wm, 10, 6, Opacity::new(0.5).unwrap());

        assert_eq!(layer.dimensions(), (10, 6));
        for y in 0..6 {
            for x in 0..10 {
                let px = layer.get_pixel(x, y);
                if (3..7).contains(&x) {
                    assert_eq!(*px, Rgba([255, 0, 0, 100]), "({x},{y})");
                } else {
                    assert_eq!(px[3], 0, "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn build_layer_clips_wide_watermark() {
        let mut wm = solid(6, 2, [0, 0, 255, 255]);
        wm.put_pixel(0, 0, Rgba([9, 9, 9, 255]));
        let layer = build_layer(&wm, 4, 2, Opacity::OPAQUE);

        // offset is -1, so the first column of the watermark is cut off
        assert_eq!(layer.dimensions(), (4, 2));
        for px in layer.pixels() {
            assert_eq!(*px, Rgba([0, 0, 255, 255]));
        }
    }

    #[test]
    fn composite_transparent_layer_keeps_base() {
        let mut base = solid(3, 3, [10, 20, 30, 255]);
        let original = base.clone();
        let layer = solid(3, 3, [255, 255, 255, 0]);
        composite_over(&mut base, &layer);
        assert_eq!(base, original);
    }

    #[test]
    fn composite_opaque_layer_replaces_base() {
        let mut base = solid(2, 2, [10, 20, 30, 255]);
        let layer = solid(2, 2, [200, 100, 50, 255]);
        composite_over(&mut base, &layer);
        for px in base.pixels() {
            assert_eq!(*px, Rgba([200, 100, 50, 255]));
        }
    }

    #[test]
    fn composite_half_alpha_over_opaque_base() {
        let mut base = solid(1, 1, [0, 0, 0, 255]);
        let layer = solid(1, 1, [255, 255, 255, 128]);
        composite_over(&mut base, &layer);
        let px = base.get_pixel(0, 0);
        assert_eq!(px[0], 128);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn composite_over_transparent_base_takes_layer_color() {
        let mut base = solid(1, 1, [0, 0, 0, 0]);
        let layer = solid(1, 1, [40, 80, 120, 100]);
        composite_over(&mut base, &layer);
        assert_eq!(*base.get_pixel(0, 0), Rgba([40, 80, 120, 100]));
    }
}
