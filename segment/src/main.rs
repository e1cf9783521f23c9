use anyhow::{Context, Result};
use segment::config::Config;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Segment the objects marked by annotated boxes
struct Args {
    #[structopt(long, default_value = "segment.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(long)]
    /// input image file
    pub image: PathBuf,
    #[structopt(long)]
    /// annotation file with box records
    pub annotations: PathBuf,
    #[structopt(long, default_value = "mask.png")]
    /// output mask image file
    pub output: PathBuf,
}

pub fn main() -> Result<()> {
    pretty_env_logger::init();

    // parse arguments
    let Args {
        config_file,
        image,
        annotations,
        output,
    } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    // start segmentation
    segment::start(&config, &image, &annotations, &output)?;

    Ok(())
}
