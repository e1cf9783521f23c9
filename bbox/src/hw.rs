use crate::{common::*, TLBR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }

    pub fn h(&self) -> T {
        self.h
    }

    pub fn w(&self) -> T {
        self.w
    }

    /// The rectangle covering the whole frame.
    pub fn frame(&self) -> TLBR<T> {
        let zero = T::zero();
        TLBR {
            t: zero,
            l: zero,
            b: self.h,
            r: self.w,
        }
    }
}

impl HW<i64> {
    pub fn from_shape(shape: (usize, usize)) -> Result<Self> {
        let (h, w) = shape;
        let h = i64::try_from(h).map_err(|_| format_err!("height {} overflows i64", h))?;
        let w = i64::try_from(w).map_err(|_| format_err!("width {} overflows i64", w))?;
        Self::try_from_hw([h, w])
    }
}
