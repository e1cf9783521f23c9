pub use anyhow::{ensure, format_err, Result};
pub use num_traits::{CheckedAdd, Num, Zero};
pub use std::convert::TryFrom;

pub fn partial_max<T>(lhs: T, rhs: T) -> T
where
    T: PartialOrd,
{
    if lhs >= rhs {
        lhs
    } else {
        rhs
    }
}

pub fn partial_min<T>(lhs: T, rhs: T) -> T
where
    T: PartialOrd,
{
    if lhs <= rhs {
        lhs
    } else {
        rhs
    }
}
