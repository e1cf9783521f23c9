use super::{HW, TLBR};
use crate::common::*;

/// The generic rectangle in half-open pixel coordinates.
///
/// A rectangle covers rows `t..b` and columns `l..r`.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Copy + Num + PartialOrd,
{
    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    fn hw(&self) -> [Self::Type; 2] {
        [self.h(), self.w()]
    }

    /// Returns true if the rectangle covers no pixel.
    fn is_empty(&self) -> bool {
        let zero = Self::Type::zero();
        self.h() <= zero || self.w() <= zero
    }

    fn contains_rect<R>(&self, other: &R) -> bool
    where
        R: Rect<Type = Self::Type>,
    {
        self.t() <= other.t() && self.l() <= other.l() && other.b() <= self.b() && other.r() <= self.r()
    }

    /// Compute the intersection, or `None` if the rectangles do not overlap.
    fn intersect_with<R>(&self, other: &R) -> Option<TLBR<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let t = partial_max(self.t(), other.t());
        let l = partial_max(self.l(), other.l());
        let b = partial_min(self.b(), other.b());
        let r = partial_min(self.r(), other.r());
        (b > t && r > l).then(|| TLBR { t, l, b, r })
    }

    /// Expand every side outward by `amount`.
    fn pad(&self, amount: Self::Type) -> Result<TLBR<Self::Type>> {
        ensure!(amount >= Self::Type::zero(), "padding must be non-negative");
        Ok(TLBR {
            t: self.t() - amount,
            l: self.l() - amount,
            b: self.b() + amount,
            r: self.r() + amount,
        })
    }

    /// Move every side inward by `amount`, or `None` if nothing is left.
    fn shrink(&self, amount: Self::Type) -> Option<TLBR<Self::Type>> {
        let t = self.t() + amount;
        let l = self.l() + amount;
        let b = self.b() - amount;
        let r = self.r() - amount;
        (b > t && r > l).then(|| TLBR { t, l, b, r })
    }

    /// Clamp every side into the frame `[0, h) x [0, w)`.
    ///
    /// The result can be empty if the rectangle lies outside the frame.
    fn clamp_to(&self, size: &HW<Self::Type>) -> TLBR<Self::Type> {
        let zero = Self::Type::zero();
        let clamp_y = |v| partial_min(partial_max(v, zero), size.h());
        let clamp_x = |v| partial_min(partial_max(v, zero), size.w());
        let t = clamp_y(self.t());
        let b = partial_max(clamp_y(self.b()), t);
        let l = clamp_x(self.l());
        let r = partial_max(clamp_x(self.r()), l);
        TLBR { t, l, b, r }
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Copy + Num + PartialOrd,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_pad_is_symmetric() {
        let rect = TLBR::try_from_tlbr([10, 20, 30, 50]).unwrap();
        let padded = rect.pad(5).unwrap();
        assert_eq!(padded.tlbr(), [5, 15, 35, 55]);
        assert_eq!(padded.h(), rect.h() + 10);
        assert_eq!(padded.w(), rect.w() + 10);
        assert!(rect.pad(-1).is_err());
    }

    #[test]
    fn rect_clamp_to_frame() {
        let frame = HW::try_from_hw([40, 60]).unwrap();
        let rect = TLBR::try_from_tlbr([-10, -5, 30, 70]).unwrap();
        assert_eq!(rect.clamp_to(&frame).tlbr(), [0, 0, 30, 60]);

        let outside = TLBR::try_from_tlbr([50, 70, 60, 80]).unwrap();
        assert!(outside.clamp_to(&frame).is_empty());
    }

    #[test]
    fn rect_intersection() {
        let lhs = TLBR::try_from_tlbr([0, 0, 10, 10]).unwrap();
        let rhs = TLBR::try_from_tlbr([5, 5, 15, 15]).unwrap();
        assert_eq!(lhs.intersect_with(&rhs).unwrap().tlbr(), [5, 5, 10, 10]);

        let apart = TLBR::try_from_tlbr([10, 10, 20, 20]).unwrap();
        assert!(lhs.intersect_with(&apart).is_none());
    }

    #[test]
    fn rect_shrink() {
        let rect = TLBR::try_from_tlbr([0, 0, 10, 8]).unwrap();
        assert_eq!(rect.shrink(2).unwrap().tlbr(), [2, 2, 8, 6]);
        assert!(rect.shrink(4).is_none());
    }
}
