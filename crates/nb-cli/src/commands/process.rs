//! Process command: run the normalization pipeline on a TIFF.

use crate::ProcessArgs;
use anyhow::{Context, Result};
use nb_cli::{io, preset};
use nb_ops::{ImageStats, Parameters, ParametersBuilder, Pipeline};
use tracing::{debug, info};

/// Resolves parameters: defaults, then the preset, then explicit options.
pub fn resolve_parameters(args: &ProcessArgs) -> Result<Parameters> {
    let base = match &args.preset {
        Some(path) => preset::load(path)?,
        None => Parameters::default(),
    };

    let mut builder = ParametersBuilder::from_parameters(base);
    if let Some(mode) = args.mode {
        builder = builder.mode(mode);
    }
    if let Some(lightness) = args.lightness {
        builder = builder.lightness(lightness);
    }
    if let Some(scnr) = args.scnr {
        builder = builder.scnr(scnr == 1);
    }
    if let Some(method) = args.scnr_method {
        builder = builder.scnr_method(method);
    }
    if let Some(palette) = args.palette {
        builder = builder.palette(palette);
    }
    if let Some(v) = args.blackpoint {
        builder = builder.blackpoint(v);
    }
    if let Some(reference) = args.blackpoint_ref {
        builder = builder.blackpoint_ref(reference);
    }
    if let Some(v) = args.sii_boost {
        builder = builder.sii_boost(v);
    }
    if let Some(v) = args.oiii_boost {
        builder = builder.oiii_boost(v);
    }
    if let Some(v) = args.hl_recover {
        builder = builder.hl_recover(v);
    }
    if let Some(v) = args.hl_reduction {
        builder = builder.hl_reduction(v);
    }
    if let Some(v) = args.brightness {
        builder = builder.brightness(v);
    }
    if args.save_channels {
        builder = builder.save_channels(true);
    }

    builder.build().context("invalid parameters")
}

/// Runs the process command.
pub fn run(args: ProcessArgs) -> Result<()> {
    let params = resolve_parameters(&args)?;
    debug!(?params, "effective parameters");
    if args.print_params {
        print!("{}", preset::to_yaml(&params)?);
    }

    let image = io::read_tiff(&args.input)?;
    let (width, height) = image.dimensions();
    info!(input = %args.input.display(), width, height, "loaded");

    if args.stats {
        println!("input: {}", args.input.display());
        println!("{}", ImageStats::compute(&image));
    }

    let pipeline = Pipeline::new(params)?;
    let stages: Vec<_> = pipeline.stages().iter().map(|s| s.name()).collect();
    info!(stages = %stages.join(" -> "), "pipeline");

    let output = pipeline
        .run(image)
        .with_context(|| format!("normalizing {}", args.input.display()))?;

    if args.stats {
        println!("output: {}", args.output.display());
        println!("{}", ImageStats::compute(&output));
    }

    if params.save_channels {
        for path in io::write_channels(&args.output, &output)? {
            info!(output = %path.display(), "saved channel");
        }
    } else {
        io::write_tiff(&args.output, &output)?;
        info!(output = %args.output.display(), "saved");
    }

    Ok(())
}
