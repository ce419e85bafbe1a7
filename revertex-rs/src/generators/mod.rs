//! Vertex and kinematics generators
//!
//! Each generator comes in three layers: a single-detector function
//! working in the detector's local frame, a collection-wide function that
//! shares the budget out by weight, and a `save_*` driver that streams the
//! result into a [`TableSink`] in bounded chunks.

pub mod beta;
pub mod borehole;
pub mod shell;
pub mod surface;

pub use beta::{BinMode, generate_beta_spectrum, generate_beta_spectrum_binned, save_beta_spectrum};
pub use borehole::{generate_hpge_borehole, generate_hpge_borehole_points, save_borehole_points};
pub use shell::{generate_hpge_shell, generate_hpge_shell_points, save_shell_points};
pub use surface::{generate_hpge_surface, generate_many_hpge_surface, save_surface_points};

use crate::{
    consts::{INTERNAL_EUNIT, MAX_CHUNK, POS_KEY},
    error::Result,
    output::{OutputMode, Table, convert_output},
    sink::{TableSink, write_chunked},
    types::Positions,
    units::length_factor,
    utils::resolve_seed,
};
use tracing::info;

/// Positions in mm rescaled to `lunit` as a `vtx/pos` table.
pub fn positions_table(mut positions: Positions, lunit: &str) -> Result<Table> {
    positions.scale(1.0 / length_factor(lunit)?);
    convert_output(&positions.to_table()?, OutputMode::Pos, lunit, INTERNAL_EUNIT)
}

/// Shared driver of the position `save_*` functions.
pub(crate) fn save_positions<S, F>(
    what: &str,
    size: usize,
    lunit: &str,
    seed: Option<u64>,
    sink: &mut S,
    mut generate: F,
) -> Result<()>
where
    S: TableSink + ?Sized,
    F: FnMut(usize, u64) -> Result<Positions>,
{
    length_factor(lunit)?;
    let seed = resolve_seed(seed);
    info!(what, size, seed, lunit, "generating vertices");

    write_chunked(size, MAX_CHUNK, seed, sink, POS_KEY, |chunk, seed| {
        positions_table(generate(chunk, seed)?, lunit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_rescaled() {
        let pos: Positions = vec![[10.0, 20.0, -5.0]].into_iter().collect();
        let table = positions_table(pos, "cm").unwrap();
        assert_eq!(table.column("xloc").unwrap().data.to_f64(), vec![1.0]);
        assert_eq!(table.column("zloc").unwrap().unit.as_deref(), Some("cm"));
    }
}
