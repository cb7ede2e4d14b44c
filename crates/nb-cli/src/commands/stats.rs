//! Stats command: print image statistics.

use crate::StatsArgs;
use anyhow::Result;
use nb_cli::io;
use nb_ops::ImageStats;

/// Runs the stats command.
pub fn run(args: StatsArgs) -> Result<()> {
    let image = io::read_tiff(&args.input)?;
    let stats = ImageStats::compute(&image);

    if args.yaml {
        print!("{}", serde_yaml::to_string(&stats)?);
    } else {
        let (width, height) = image.dimensions();
        println!("{}", args.input.display());
        println!("  Resolution: {width}x{height}");
        for line in stats.to_string().lines() {
            println!("  {line}");
        }
    }
    Ok(())
}
