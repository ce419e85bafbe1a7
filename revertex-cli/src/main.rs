//! revertex command line interface

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use revertex::{
    DetectorCollection, Registry, RejectionConfig, TextSink,
    consts::{DEFAULT_LUNIT, DEFAULT_MAX_ATTEMPTS},
    generators,
    geometry::SurfaceType,
    io::read_input_beta_csv,
};
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "revertex", version, about = "Generate primary vertices and kinematics")]
struct Cli {
    /// Increase the verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Seed for the random number generator
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Rejection attempts before giving up on a geometry
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate beta kinematics from a csv file
    BetaKin {
        /// Spectrum to sample: energy and phase space per line
        #[arg(short, long)]
        input_file: PathBuf,

        #[arg(short, long)]
        out_file: PathBuf,

        #[arg(short, long)]
        n_events: usize,

        /// Unit of the energies in the input file
        #[arg(short, long)]
        eunit: String,
    },
    /// Generate vertices on HPGe surfaces
    HpgeSurfPos {
        #[command(flatten)]
        common: PositionArgs,

        /// nplus, pplus or passive; all surfaces when omitted
        #[arg(short = 't', long)]
        surface_type: Option<SurfaceType>,
    },
    /// Generate vertices inside HPGe boreholes
    HpgeBoreholePos {
        #[command(flatten)]
        common: PositionArgs,
    },
    /// Generate vertices in a thin layer outside HPGe surfaces
    HpgeShellPos {
        #[command(flatten)]
        common: PositionArgs,

        #[arg(short = 't', long)]
        surface_type: Option<SurfaceType>,

        /// Thickness of the layer, in mm
        #[arg(long)]
        distance: f64,
    },
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Geometry registry (JSON)
    #[arg(short, long)]
    geometry: PathBuf,

    /// Detector names or wildcard patterns
    #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
    detectors: Vec<String>,

    #[arg(short, long)]
    out_file: PathBuf,

    #[arg(short, long)]
    n_events: usize,

    /// Length unit of the output
    #[arg(short, long, default_value = DEFAULT_LUNIT)]
    lunit: String,
}

impl PositionArgs {
    fn collection(&self) -> Result<DetectorCollection> {
        let registry = Registry::load(&self.geometry)
            .with_context(|| format!("reading geometry {}", self.geometry.display()))?;
        Ok(registry.collection(&self.detectors)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let cfg = RejectionConfig {
        max_attempts: cli.max_attempts,
    };
    if cfg.max_attempts == 0 {
        bail!("--max-attempts must be at least 1");
    }

    match &cli.command {
        Command::BetaKin {
            input_file,
            out_file,
            n_events,
            eunit,
        } => {
            info!(
                input = %input_file.display(),
                output = %out_file.display(),
                seed = ?cli.seed,
                "generating beta kinematics"
            );
            let (energies, phase_space) = read_input_beta_csv(input_file)
                .with_context(|| format!("reading spectrum {}", input_file.display()))?;
            let mut sink = TextSink::new(out_file);
            generators::save_beta_spectrum(*n_events, &energies, &phase_space, eunit, cli.seed, &mut sink)?;
        }
        Command::HpgeSurfPos {
            common,
            surface_type,
        } => {
            let collection = common.collection()?;
            let mut sink = TextSink::new(&common.out_file);
            generators::save_surface_points(
                common.n_events,
                &collection,
                *surface_type,
                &common.lunit,
                cli.seed,
                &mut sink,
            )?;
        }
        Command::HpgeBoreholePos { common } => {
            let collection = common.collection()?;
            let mut sink = TextSink::new(&common.out_file);
            generators::save_borehole_points(
                common.n_events,
                &collection,
                &common.lunit,
                cli.seed,
                &cfg,
                &mut sink,
            )?;
        }
        Command::HpgeShellPos {
            common,
            surface_type,
            distance,
        } => {
            let collection = common.collection()?;
            let mut sink = TextSink::new(&common.out_file);
            generators::save_shell_points(
                common.n_events,
                &collection,
                *surface_type,
                *distance,
                &common.lunit,
                cli.seed,
                &cfg,
                &mut sink,
            )?;
        }
    }

    info!("done");
    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_pattern_lists() {
        let cli = Cli::try_parse_from([
            "revertex",
            "--seed",
            "3",
            "hpge-surf-pos",
            "-g",
            "geom.json",
            "-d",
            "V*,B00",
            "-t",
            "nplus",
            "-o",
            "out.txt",
            "-n",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(3));
        match cli.command {
            Command::HpgeSurfPos {
                common,
                surface_type,
            } => {
                assert_eq!(common.detectors, vec!["V*", "B00"]);
                assert_eq!(surface_type, Some(SurfaceType::NPlus));
                assert_eq!(common.lunit, "mm");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
