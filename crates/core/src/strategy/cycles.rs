use std::fmt::Display;

use crate::state::Asset;

/// A candidate cycle `base -> first -> second -> base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle<'a> {
    pub base: &'a Asset,
    pub first: &'a Asset,
    pub second: &'a Asset,
}

impl Cycle<'_> {
    pub fn hops(&self) -> [(&Asset, &Asset); 3] {
        [
            (self.base, self.first),
            (self.first, self.second),
            (self.second, self.base),
        ]
    }

    pub fn path(&self) -> [Asset; 4] {
        [
            self.base.clone(),
            self.first.clone(),
            self.second.clone(),
            self.base.clone(),
        ]
    }
}

impl Display for Cycle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} → {} → {} → {}",
            self.base, self.first, self.second, self.base
        )
    }
}

/// Generates every directed 3-asset cycle that starts and ends at a base asset.
///
/// Both orientations of a triangle are produced (`base, X, Y` and
/// `base, Y, X`) since they are different trade sequences. Work grows with
/// `bases * n^2`, fine for the tens of assets a snapshot carries.
#[derive(Debug, Clone)]
pub struct CycleEnumerator<'a> {
    universe: Vec<&'a Asset>,
    bases: Vec<&'a Asset>,
}

impl<'a> CycleEnumerator<'a> {
    /// `universe` should come from the snapshot so that its order is fixed.
    /// Repeated base assets are only seeded once.
    pub fn new(universe: impl IntoIterator<Item = &'a Asset>, base_assets: &'a [Asset]) -> Self {
        let mut bases: Vec<&Asset> = Vec::with_capacity(base_assets.len());
        for base in base_assets {
            if !bases.contains(&base) {
                bases.push(base);
            }
        }

        Self {
            universe: universe.into_iter().collect(),
            bases,
        }
    }

    pub fn cycles(&self) -> Vec<Cycle<'a>> {
        if self.universe.len() < 3 {
            return Vec::new();
        }

        let mut cycles = Vec::new();
        for &base in &self.bases {
            for &first in self.universe.iter().filter(|&&asset| asset != base) {
                for &second in self
                    .universe
                    .iter()
                    .filter(|&&asset| asset != base && asset != first)
                {
                    cycles.push(Cycle {
                        base,
                        first,
                        second,
                    });
                }
            }
        }
        cycles
    }
}
