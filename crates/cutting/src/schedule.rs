//! Cut scheduling: grouping existing adjacency before synthesis.
//!
//! Scheduling reorders cuts without creating geometry: it finds the
//! maximal contiguous chains that are already connected (same tool,
//! each cut starting where the previous one ends) and reorders whole
//! chains so that drilling happens before profile and knife cuts.
//! Synthesizing the motion that connects chains is the transition
//! pass's job.

use crate::cut::{adjacent, Cut, CutGeometry};

/// Splits `cuts` into maximal contiguous chains. Within a chain every
/// consecutive pair shares a tool and is spatially adjacent.
pub fn chain_cuts(cuts: Vec<Cut>) -> Vec<Vec<Cut>> {
    let mut chains: Vec<Vec<Cut>> = Vec::new();
    for cut in cuts {
        let extends = chains.last().is_some_and(|chain| {
            let prev = chain.last().expect("chains are never empty");
            prev.tool == cut.tool && adjacent(prev, &cut)
        });
        if extends {
            chains.last_mut().expect("just checked").push(cut);
        } else {
            chains.push(vec![cut]);
        }
    }
    chains
}

/// Reorders cuts for execution: chains stay internally ordered and
/// grouped, chains keep their first-appearance order, and hole-punch
/// chains move to the front so drilling runs before profile cuts.
pub fn schedule_cuts(cuts: Vec<Cut>) -> Vec<Cut> {
    let chains = chain_cuts(cuts);
    let (holes, rest): (Vec<Vec<Cut>>, Vec<Vec<Cut>>) = chains
        .into_iter()
        .partition(|chain| chain.iter().all(|c| matches!(c.geom, CutGeometry::Hole { .. })));
    holes.into_iter().chain(rest).flatten().collect()
}
