//! Least-visited random walk over a [`JunctionTable`].
//!
//! A walker moves junction to junction along the table's adjacency.  At each
//! step it prefers the neighbours with the lowest visit count, counted
//! across every walker sharing the same [`VisitCounter`], and breaks ties
//! uniformly at random.  This spreads several walkers over the street
//! network instead of letting them bounce along the same few blocks.

use jx_core::WalkRng;

use crate::table::JunctionTable;

/// Visit counts per junction, shared by all walkers on one table.
#[derive(Clone, Debug)]
pub struct VisitCounter {
    counts: Vec<u32>,
}

impl VisitCounter {
    pub fn new(table: &JunctionTable) -> Self {
        Self { counts: vec![0; table.len()] }
    }

    #[inline]
    pub fn count(&self, junction: usize) -> u32 {
        self.counts[junction]
    }

    #[inline]
    fn visit(&mut self, junction: usize) {
        self.counts[junction] += 1;
    }
}

/// One move from junction to junction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Leg {
    pub from: usize,
    pub to: usize,
    /// Planar distance when the table is projected, great-circle otherwise.
    pub distance_m: f64,
    /// `distance_m / speed`; zero for a non-positive speed.
    pub duration_secs: f64,
}

pub struct LeastVisitedWalk {
    current:   usize,
    speed_mps: f64,
    rng:       WalkRng,
}

impl LeastVisitedWalk {
    /// Place a walker on junction 0 and count that visit.
    ///
    /// Returns `None` for an empty table.
    pub fn start(
        table: &JunctionTable,
        visits: &mut VisitCounter,
        speed_mps: f64,
        rng: WalkRng,
    ) -> Option<Self> {
        if table.is_empty() {
            return None;
        }
        visits.visit(0);
        Some(Self { current: 0, speed_mps, rng })
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Move to a least-visited neighbour.
    ///
    /// Returns `None`, leaving the walker in place, when the current junction
    /// has no neighbours.
    pub fn step(&mut self, table: &JunctionTable, visits: &mut VisitCounter) -> Option<Leg> {
        let here = table.junction(self.current);
        let min = here.adjacency.iter().map(|&j| visits.count(j)).min()?;

        let candidates: Vec<usize> = here
            .adjacency
            .iter()
            .copied()
            .filter(|&j| visits.count(j) == min)
            .collect();
        let next = *self.rng.choose(&candidates)?;

        let there = table.junction(next);
        let distance_m = match (here.local, there.local) {
            (Some(a), Some(b)) => a.distance(b),
            _ => here.pos.distance_m(there.pos),
        };
        let duration_secs = if self.speed_mps > 0.0 { distance_m / self.speed_mps } else { 0.0 };

        let leg = Leg { from: self.current, to: next, distance_m, duration_secs };
        self.current = next;
        visits.visit(next);
        Some(leg)
    }
}
