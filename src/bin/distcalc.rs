//! Distance Calculator Tool
//!
//! Builds a distance from a distance modulus, a redshift, or a value with a
//! unit and prints it in every supported unit, or converts a cartesian point
//! to spherical coordinates.
//!
//! Usage:
//!   cargo run --bin distcalc -- distmod 24.47
//!   cargo run --bin distcalc -- redshift 0.23 --cosmology WMAP5
//!   cargo run --bin distcalc -- distance 10 Mpc
//!   cargo run --bin distcalc -- spherical 1 2 3 kpc

use std::path::PathBuf;
use std::sync::Arc;

use astrodist::coordinates::{CartesianPoint, Distance};
use astrodist::cosmology::{default_cosmology, Cosmology, FlatLambdaCdm};
use clap::{Parser, Subcommand};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Distance Calculator Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts between distances, redshifts, distance moduli and coordinates",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Distance for a distance modulus in magnitudes
    Distmod {
        #[arg(allow_hyphen_values = true)]
        distmod: f64,

        /// Express the result in this unit instead of picking pc, kpc or Mpc
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Luminosity distance at a redshift
    Redshift {
        z: f64,

        /// Built-in cosmology (WMAP5, WMAP7, WMAP9, Planck13)
        #[arg(short, long, conflicts_with = "cosmology_file")]
        cosmology: Option<String>,

        /// JSON file with "name", "H0" and "Om0" fields
        #[arg(long)]
        cosmology_file: Option<PathBuf>,
    },

    /// A distance given as a value and a length unit
    Distance {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        unit: String,
    },

    /// Spherical coordinates of a cartesian point
    Spherical {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        #[arg(allow_hyphen_values = true)]
        z: f64,
        #[arg(default_value = "pc")]
        unit: String,
    },
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{:<16} {}", format!("{}:", name), value);
}

/// The single value of a one-element array, for display
fn scalar_of(values: &ndarray::ArrayD<f64>) -> f64 {
    values.iter().next().copied().unwrap_or(f64::NAN)
}

fn resolve_cosmology(
    name: Option<String>,
    file: Option<PathBuf>,
) -> Result<Arc<dyn Cosmology>> {
    if let Some(path) = file {
        let json = std::fs::read_to_string(&path)?;
        return Ok(Arc::new(FlatLambdaCdm::from_json(&json)?));
    }
    match name {
        Some(name) => match FlatLambdaCdm::preset(&name) {
            Some(cosmology) => Ok(Arc::new(cosmology)),
            None => Err(format!("Unknown cosmology \"{}\"", name).into()),
        },
        None => Ok(default_cosmology()),
    }
}

/// Displays a distance in every supported unit along with its derived values
fn display_distance(distance: &Distance, cosmology: &dyn Cosmology) {
    print_section_header("Distance");
    print_named_value("Value", distance);
    print_named_value("Parsecs", scalar_of(&distance.pc()));
    print_named_value("Kiloparsecs", scalar_of(&distance.kpc()));
    print_named_value("Megaparsecs", scalar_of(&distance.mpc()));
    print_named_value("Light-years", scalar_of(&distance.lyr()));
    print_named_value("Kilometers", scalar_of(&distance.km()));

    print_section_header("Derived");
    print_named_value("Distance mod.", distance.distmod());
    match distance.compute_z(Some(cosmology)) {
        Ok(z) => print_named_value("Redshift", format!("{:.8} ({})", z, cosmology.name())),
        Err(e) => print_named_value("Redshift", format!("unavailable: {}", e)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Distmod { distmod, unit } => {
            let mut builder = Distance::builder().distmod(distmod);
            if let Some(unit) = unit {
                builder = builder.unit(unit);
            }
            let distance = builder.build()?;
            display_distance(&distance, default_cosmology().as_ref());
        }
        Command::Redshift {
            z,
            cosmology,
            cosmology_file,
        } => {
            let cosmology = resolve_cosmology(cosmology, cosmology_file)?;
            let distance = Distance::from_redshift(z, Some(Arc::clone(&cosmology)))?;
            display_distance(&distance, cosmology.as_ref());
        }
        Command::Distance { value, unit } => {
            let distance = Distance::new(value, unit)?;
            display_distance(&distance, default_cosmology().as_ref());
        }
        Command::Spherical { x, y, z, unit } => {
            let point = CartesianPoint::new(x, y, z, unit)?;
            let (r, lat, lon) = point.to_spherical()?;

            print_section_header("Cartesian");
            print_named_value("Point", &point);
            print_named_value("Norm", point.norm());

            print_section_header("Spherical");
            print_named_value("Distance", &r);
            print_named_value(
                "Latitude",
                format!("{:.10} deg", scalar_of(&lat.to_degrees())),
            );
            print_named_value(
                "Longitude",
                format!("{:.10} deg", scalar_of(&lon.to_degrees())),
            );
        }
    }

    Ok(())
}
