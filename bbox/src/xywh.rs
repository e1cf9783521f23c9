use crate::common::*;

/// Unchecked rectangle given as top-left corner plus width and height.
///
/// This is the raw form of annotation boxes. The width or height may be
/// zero or negative; convert to [TLBR](crate::TLBR) to validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XYWH<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T> XYWH<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Returns true if the width or the height is not positive.
    pub fn is_degenerate(&self) -> bool {
        let zero = T::zero();
        self.w <= zero || self.h <= zero
    }

    pub fn xywh(&self) -> [T; 4] {
        [self.x, self.y, self.w, self.h]
    }
}
