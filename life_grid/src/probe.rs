//! Spatial probe: which cells near the cursor should sound this tick.

use std::collections::HashSet;

use crate::cursor::{CursorState, Geometry};
use crate::grid::{Coord, Grid};

/// Where probe candidates come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProbeSource {
    /// Only cells born in the current step.
    Born,
    /// Every live cell.  Needed for the Stable voice class to ever sound,
    /// since newborn cells always have stability 0.
    #[default]
    Live,
}

impl ProbeSource {
    /// Run [`probe`] over the candidates this source selects.
    pub fn probe(
        self,
        grid:     &Grid,
        born:     &HashSet<Coord>,
        cursor:   &CursorState,
        geometry: &Geometry,
        running:  bool,
    ) -> HashSet<Coord> {
        match self {
            ProbeSource::Born => probe(born.iter().copied(), cursor, geometry, running),
            ProbeSource::Live => probe(grid.coords(), cursor, geometry, running),
        }
    }
}

/// Candidates within `cursor.radius` (Euclidean, inclusive) of the grid cell
/// under the cursor.
///
/// Empty when the simulation is paused or there is no cursor; this is what
/// silences the sound output.
pub fn probe<I>(
    candidates: I,
    cursor:     &CursorState,
    geometry:   &Geometry,
    running:    bool,
) -> HashSet<Coord>
where
    I: IntoIterator<Item = Coord>,
{
    if !running {
        return HashSet::new();
    }
    let Some((cx, cy)) = cursor.grid_center(geometry) else {
        return HashSet::new();
    };
    let r2 = (cursor.radius as i64).pow(2);

    candidates
        .into_iter()
        .filter(|&(x, y)| {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            dx * dx + dy * dy <= r2
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> Geometry {
        Geometry::new(100, 100, 10)
    }

    fn ring() -> Vec<Coord> {
        // cursor cell is (5, 5)
        vec![(5, 5), (7, 5), (5, 3), (8, 5), (7, 7), (6, 7)]
    }

    #[test]
    fn paused_probe_is_empty() {
        let c = CursorState::at(55, 55, 10);
        assert!(probe(ring(), &c, &geom(), false).is_empty());
    }

    #[test]
    fn missing_cursor_probe_is_empty() {
        let c = CursorState::default();
        assert!(probe(ring(), &c, &geom(), true).is_empty());
    }

    #[test]
    fn probe_is_circular_and_inclusive() {
        let c = CursorState::at(55, 55, 2);
        let hit = probe(ring(), &c, &geom(), true);
        let mut v: Vec<_> = hit.into_iter().collect();
        v.sort();
        // (7,7) is at distance √8 > 2 even though it is inside the 2-box.
        assert_eq!(v, vec![(5, 3), (5, 5), (7, 5)]);
    }

    #[test]
    fn source_selects_candidates() {
        let mut grid = Grid::new();
        grid.insert((5, 5), 0);
        grid.insert((6, 5), 0);
        let born: HashSet<Coord> = [(6, 5)].into_iter().collect();
        let c = CursorState::at(55, 55, 3);

        let live = ProbeSource::Live.probe(&grid, &born, &c, &geom(), true);
        assert_eq!(live.len(), 2);
        let only_born = ProbeSource::Born.probe(&grid, &born, &c, &geom(), true);
        assert_eq!(only_born, born);
    }
}
