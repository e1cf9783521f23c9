use super::{Rect, XYWH};
use crate::common::*;

/// Rectangle in TLBR format, half-open on the bottom and right sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Offset the rectangle by `(dy, dx)`.
    pub fn translate(&self, dy: T, dx: T) -> Self {
        TLBR {
            t: self.t + dy,
            l: self.l + dx,
            b: self.b + dy,
            r: self.r + dx,
        }
    }
}

impl<T> Rect for TLBR<T>
where
    T: Copy + Num + PartialOrd + CheckedAdd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let b = t
            .checked_add(&h)
            .ok_or_else(|| format_err!("the bottom side overflows"))?;
        let r = l
            .checked_add(&w)
            .ok_or_else(|| format_err!("the right side overflows"))?;
        Self::try_from_tlbr([t, l, b, r])
    }
}

impl<T> TryFrom<XYWH<T>> for TLBR<T>
where
    T: Copy + Num + PartialOrd + CheckedAdd,
{
    type Error = anyhow::Error;

    fn try_from(from: XYWH<T>) -> Result<Self, Self::Error> {
        Self::try_from(&from)
    }
}

impl<T> TryFrom<&XYWH<T>> for TLBR<T>
where
    T: Copy + Num + PartialOrd + CheckedAdd,
{
    type Error = anyhow::Error;

    fn try_from(from: &XYWH<T>) -> Result<Self, Self::Error> {
        let XYWH { x, y, w, h } = *from;
        Self::try_from_tlhw([y, x, h, w])
    }
}
