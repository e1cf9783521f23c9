pub use crate::error::SegmentError;
pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::{prelude::*, HW, TLBR, XYWH};
pub use getset::{CopyGetters, Getters};
pub use log::{debug, info, warn};
pub use nd_goodies::{ArrayExt as _, Interpolation, Ratio};
pub use ndarray::{s, Array2, Array3, Array4, ArrayView2, ArrayView3, Axis, Zip};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    path::{Path, PathBuf},
    time::Instant,
};
#[cfg(feature = "with-tch")]
pub use tch::{CModule, Device, IValue};
