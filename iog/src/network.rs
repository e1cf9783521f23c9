use crate::common::*;

#[cfg(feature = "with-tch")]
pub use torch_script::*;

/// A segmentation network consuming `[N, C, R, R]` batches.
///
/// The outputs are ordered from coarse to fine. The last one must be the
/// `[N, 1, R, R]` logits of the foreground.
pub trait Network {
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<Array4<f32>>>;
}

impl<N> Network for &N
where
    N: Network + ?Sized,
{
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<Array4<f32>>> {
        (**self).forward(input)
    }
}

impl<N> Network for Box<N>
where
    N: Network + ?Sized,
{
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<Array4<f32>>> {
        (**self).forward(input)
    }
}

/// Options to load a serialized network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkInit {
    /// The TorchScript module file.
    pub weights_file: PathBuf,
    /// Backbone name, informational only.
    #[serde(default = "default_backbone")]
    pub backbone: String,
    #[serde(default = "default_input_channels")]
    pub input_channels: usize,
    #[serde(default = "default_output_stride")]
    pub output_stride: usize,
    #[serde(default)]
    pub use_cuda: bool,
}

impl NetworkInit {
    pub fn new(weights_file: impl Into<PathBuf>) -> Self {
        Self {
            weights_file: weights_file.into(),
            backbone: default_backbone(),
            input_channels: default_input_channels(),
            output_stride: default_output_stride(),
            use_cuda: false,
        }
    }
}

fn default_backbone() -> String {
    "resnet101".into()
}

fn default_input_channels() -> usize {
    5
}

fn default_output_stride() -> usize {
    16
}

#[cfg(feature = "with-tch")]
mod torch_script {
    use super::*;
    use nd_goodies::{IntoTensor as _, TryIntoArray as _};

    /// A network backed by a TorchScript module.
    pub struct TorchScriptNetwork {
        module: CModule,
        device: Device,
        input_channels: usize,
    }

    impl NetworkInit {
        pub fn build(self) -> Result<TorchScriptNetwork> {
            let Self {
                weights_file,
                backbone,
                input_channels,
                output_stride,
                use_cuda,
            } = self;

            ensure!(input_channels > 0, "input_channels must be positive");
            ensure!(
                [8, 16].contains(&output_stride),
                "output_stride must be 8 or 16, but get {}",
                output_stride
            );

            let device = if !use_cuda {
                Device::Cpu
            } else if tch::Cuda::is_available() {
                Device::Cuda(0)
            } else {
                warn!("CUDA is requested but not available, fall back to CPU");
                Device::Cpu
            };

            info!(
                "load {} network with output stride {} from '{}' on {:?}",
                backbone,
                output_stride,
                weights_file.display(),
                device
            );
            let module = CModule::load_on_device(&weights_file, device).with_context(|| {
                format!("failed to load weights file '{}'", weights_file.display())
            })?;

            Ok(TorchScriptNetwork {
                module,
                device,
                input_channels,
            })
        }
    }

    impl TorchScriptNetwork {
        pub fn device(&self) -> Device {
            self.device
        }
    }

    impl Network for TorchScriptNetwork {
        fn forward(&self, input: &Array4<f32>) -> Result<Vec<Array4<f32>>> {
            let channels = input.shape()[1];
            ensure!(
                channels == self.input_channels,
                "the network expects {} input channels, but get {}",
                self.input_channels,
                channels
            );

            tch::no_grad(|| {
                let input = input.into_tensor().to_device(self.device);
                let output = self.module.forward_is(&[IValue::Tensor(input)])?;

                let tensors = match output {
                    IValue::Tensor(tensor) => vec![tensor],
                    IValue::TensorList(tensors) => tensors,
                    IValue::Tuple(values) | IValue::GenericList(values) => values
                        .into_iter()
                        .map(|value| match value {
                            IValue::Tensor(tensor) => Ok(tensor),
                            other => bail!("unexpected network output element {:?}", other),
                        })
                        .collect::<Result<_>>()?,
                    other => bail!("unexpected network output {:?}", other),
                };

                tensors
                    .iter()
                    .map(|tensor| tensor.try_into_array4())
                    .collect()
            })
        }
    }
}
