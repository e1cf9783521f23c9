use crate::common::*;

pub trait IntoTensor {
    fn into_tensor(self) -> Tensor;
}

impl IntoTensor for ArrayView4<'_, f32> {
    fn into_tensor(self) -> Tensor {
        let shape: Vec<i64> = self.shape().iter().map(|&dim| dim as i64).collect();
        let buffer: Vec<f32> = self.iter().cloned().collect();
        Tensor::of_slice(&buffer).view(shape.as_slice())
    }
}

impl IntoTensor for &Array4<f32> {
    fn into_tensor(self) -> Tensor {
        self.view().into_tensor()
    }
}

pub trait TryIntoArray {
    fn try_into_array4(&self) -> Result<Array4<f32>>;
}

impl TryIntoArray for Tensor {
    fn try_into_array4(&self) -> Result<Array4<f32>> {
        let (batch_size, channels, height, width) = self.size4()?;
        let tensor = self
            .to_device(Device::Cpu)
            .to_kind(Kind::Float)
            .contiguous();
        let buffer = Vec::<f32>::from(&tensor);
        let array = Array4::from_shape_vec(
            (
                batch_size as usize,
                channels as usize,
                height as usize,
                width as usize,
            ),
            buffer,
        )?;
        Ok(array)
    }
}
