//! # revertex: primary vertices and kinematics for HPGe simulations
//!
//! Samples the starting points and momenta that a particle transport
//! simulation consumes: beta electrons from a tabulated spectrum, and
//! vertex positions on, inside the borehole of, or in a thin shell around
//! germanium detectors described as solids of revolution.
//!
//! Every generator takes an explicit seed. A run is reproducible from that
//! seed alone; rejection retries and output chunks derive their seeds from
//! it deterministically.

pub mod allocate;
pub mod categorical;
pub mod collection;
pub mod consts;
pub mod error;
pub mod generators;
pub mod geometry;
pub mod histogram;
pub mod io;
pub mod output;
pub mod radial;
pub mod region;
pub mod registry;
mod simd;
pub mod sink;
pub mod types;
pub mod units;
pub mod utils;

pub use collection::{DetectorCollection, DetectorEntry};
pub use error::{Error, Result};
pub use histogram::{Histogram, sample_histogram};
pub use output::{Column, ColumnData, OutputMode, Table, chunk_sizes, convert_output};
pub use radial::sample_proportional_radius;
pub use region::{BoundingCylinder, RejectionConfig, sample_region};
pub use registry::{Registry, expand_patterns};
pub use sink::{MemorySink, TableSink, TextSink, WriteMode};
pub use types::{Kinematics, Positions, Vec3};
