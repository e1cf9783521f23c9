pub use anyhow::{bail, ensure, format_err, Error, Result};
pub use approx::AbsDiffEq;
pub use bbox::{prelude::*, HW, TLBR};
pub use image::{GrayImage, Luma};
pub use imageproc::distance_transform::euclidean_squared_distance_transform;
pub use ndarray::{
    Array, Array2, Array3, Array4, ArrayBase, ArrayView2, ArrayView3, ArrayView4, Axis, Data,
    Dimension, RemoveAxis, Slice,
};
pub use noisy_float::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
};
#[cfg(feature = "tch")]
pub use tch::{Device, Kind, Tensor};
