//! Mask, crop and paste-back geometry in image coordinates.

use crate::common::*;

/// What [crop_bbox] returns when the mask has no foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMaskPolicy {
    /// Fall back to the whole frame.
    FullFrame,
    Nothing,
}

/// Rasterize `bbox` as a mask of ones on a zero background of size `size`.
///
/// The parts of the box outside the frame are dropped. A degenerate box, or one
/// whose extent overflows, yields an all-zero mask.
pub fn box_to_region_mask(size: &HW<i64>, bbox: &XYWH<i64>) -> Array2<f32> {
    let mut mask = Array2::zeros((size.h() as usize, size.w() as usize));

    if let Ok(rect) = TLBR::try_from(bbox) {
        let rect = rect.clamp_to(size);
        if !rect.is_empty() {
            let [t, l, b, r] = rect.tlbr();
            mask.slice_mut(s![t as usize..b as usize, l as usize..r as usize]).fill(1.0);
        }
    }

    mask
}

/// The complement of a region mask.
pub fn void_mask(region: &Array2<f32>) -> Array2<f32> {
    region.mapv(|value| 1.0 - value)
}

/// The tightest rectangle covering all positive pixels.
pub fn mask_bbox(mask: ArrayView2<'_, f32>) -> Option<TLBR<i64>> {
    bbox_where(mask, |value| value > 0.0)
}

pub(crate) fn bbox_where<F>(mask: ArrayView2<'_, f32>, predicate: F) -> Option<TLBR<i64>>
where
    F: Fn(f32) -> bool,
{
    let [t, l, b, r] = mask
        .indexed_iter()
        .filter(|&(_, &value)| predicate(value))
        .fold(None::<[i64; 4]>, |extent, ((y, x), _)| {
            let (y, x) = (y as i64, x as i64);
            Some(match extent {
                None => [y, x, y + 1, x + 1],
                Some([t, l, b, r]) => [t.min(y), l.min(x), b.max(y + 1), r.max(x + 1)],
            })
        })?;
    TLBR::try_from_tlbr([t, l, b, r]).ok()
}

/// Compute the crop rectangle around the foreground of `mask`, padded by `pad`
/// pixels on every side.
///
/// Without `zero_pad`, the rectangle is clamped to the mask frame. With
/// `zero_pad`, it may extend past the frame and the outside is later filled
/// with zeros.
pub fn crop_bbox(
    mask: ArrayView2<'_, f32>,
    pad: i64,
    zero_pad: bool,
    on_empty: EmptyMaskPolicy,
) -> Result<Option<TLBR<i64>>> {
    let size = HW::from_shape(mask.dim())?;

    let tight = match mask_bbox(mask) {
        Some(tight) => tight,
        None => {
            return Ok(match on_empty {
                EmptyMaskPolicy::FullFrame => Some(size.frame()),
                EmptyMaskPolicy::Nothing => None,
            })
        }
    };

    let padded = tight.pad(pad)?;
    let rect = if zero_pad {
        padded
    } else {
        padded.clamp_to(&size)
    };
    Ok(Some(rect))
}

/// Copy `crop_bbox` out of an `[H, W]` mask or an `[H, W, C]` image.
pub fn extract_crop<A>(source: &A, crop_bbox: &TLBR<i64>, zero_pad: bool) -> Result<A::Output>
where
    A: nd_goodies::ArrayExt,
{
    source.crop_tlbr(crop_bbox, zero_pad)
}

/// Resize `crop` to the size of `crop_bbox` and paste it at that position on a
/// zero canvas of size `full_size`.
///
/// The parts of the crop falling outside the canvas are dropped. With
/// `mask_relax`, only the inner part of `crop_bbox` shrunk by `relax` pixels is
/// kept. Without `zero_pad`, `crop_bbox` must lie within the canvas.
pub fn crop_to_full_mask(
    crop: ArrayView2<'_, f32>,
    crop_bbox: &TLBR<i64>,
    full_size: &HW<i64>,
    zero_pad: bool,
    relax: i64,
    mask_relax: bool,
    interpolation: Interpolation,
) -> Result<Array2<f32>> {
    ensure!(
        !crop_bbox.is_empty(),
        "crop rectangle {:?} is empty",
        crop_bbox.tlbr()
    );
    let frame = full_size.frame();
    ensure!(
        zero_pad || frame.contains_rect(crop_bbox),
        "crop rectangle {:?} exceeds the frame of size {:?}",
        crop_bbox.tlbr(),
        [full_size.h(), full_size.w()]
    );

    let resized = crop.resize2d(crop_bbox.h() as usize, crop_bbox.w() as usize, interpolation)?;

    // the frame seen from the crop's coordinates
    let window = frame.translate(-crop_bbox.t(), -crop_bbox.l());
    let full = resized.crop_tlbr(&window, true)?;

    if !mask_relax {
        return Ok(full);
    }

    let mut kept = Array2::zeros(full.dim());
    if let Some(inner) = crop_bbox
        .shrink(relax)
        .and_then(|inner| frame.intersect_with(&inner))
    {
        let [t, l, b, r] = inner.tlbr();
        let (t, l, b, r) = (t as usize, l as usize, b as usize, r as usize);
        kept.slice_mut(s![t..b, l..r]).assign(&full.slice(s![t..b, l..r]));
    }
    Ok(kept)
}
