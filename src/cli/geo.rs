//! Offline coordinate commands

use crate::config::Config;
use crate::coord::math::{distance_km, dms_to_decimal};
use crate::coord::{Coordinate, Hemisphere};
use crate::error::Result;
use clap::Args;

/// Distance command arguments
#[derive(Args)]
pub struct DistanceArgs {
    /// First position as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub from: Coordinate,

    /// Second position as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub to: Coordinate,
}

/// DMS command arguments
#[derive(Args)]
pub struct DmsArgs {
    pub degrees: f64,

    pub minutes: f64,

    pub seconds: f64,

    /// N, S, E or W
    pub hemisphere: Hemisphere,
}

/// Check command arguments
#[derive(Args)]
pub struct CheckArgs {
    /// Position as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub position: Coordinate,

    /// Map link provider (see `config url.default`)
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

pub fn distance(args: DistanceArgs) -> Result<()> {
    println!("{:.2} km", distance_km(args.from, args.to));
    Ok(())
}

pub fn dms(args: DmsArgs) -> Result<()> {
    let value = dms_to_decimal(args.degrees, args.minutes, args.seconds, args.hemisphere);
    println!("{:.6}", value);
    Ok(())
}

pub fn check(args: CheckArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let mut config = Config::load()?;
    if let Some(provider) = args.provider {
        config.url.default = provider;
    }

    print!("{}", formatter.format_position(&args.position, &config)?);
    Ok(())
}
