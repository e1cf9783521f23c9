mod common;
pub mod config;
pub mod io;

use crate::{common::*, config::Config};

/// Segment the annotated boxes of an image file and save the mask as an image file.
pub fn start(
    config: &Config,
    image_file: &Path,
    annotation_file: &Path,
    output_file: &Path,
) -> Result<()> {
    let image = io::load_image(image_file)?;
    let annotations = AnnotationSet::load(annotation_file)?;
    let network = build_network(&config.model)?;

    let mask = run(config, network, &image, &annotations)?;
    io::save_mask(mask.view(), output_file)?;
    info!("mask is saved to '{}'", output_file.display());

    Ok(())
}

/// Segment the annotated boxes of an `[H, W, 3]` image with the given network.
pub fn run<N>(
    config: &Config,
    network: N,
    image: &Array3<f32>,
    annotations: &AnnotationSet,
) -> Result<Array2<f32>>
where
    N: Network,
{
    let (height, width, _) = image.dim();
    info!(
        "segment {} annotation records on a {}x{} image",
        annotations.analysis_results.len(),
        width,
        height
    );

    let segmenter = config.segmenter_init().build(network)?;
    let mask = segmenter.segment_records(image.view(), &annotations.analysis_results)?;
    Ok(mask)
}

#[cfg(feature = "with-tch")]
fn build_network(init: &NetworkInit) -> Result<Box<dyn Network>> {
    let network = init.clone().build()?;
    Ok(Box::new(network))
}

#[cfg(not(feature = "with-tch"))]
fn build_network(init: &NetworkInit) -> Result<Box<dyn Network>> {
    bail!(
        "unable to load '{}': the program is built without the with-tch feature",
        init.weights_file.display()
    )
}
