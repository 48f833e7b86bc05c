//! Narrowing index over map patterns
//!
//! Built once from the full pattern collection and read-only afterwards, so it
//! can be shared freely between threads.

use super::types::{MapPattern, PoiType, Position};
use std::collections::{BTreeMap, BTreeSet};

/// `(earth_shifting, nightlord)`
pub type PatternKey = (u32, u32);

/// `(earth_shifting, nightlord, position)`
pub type PositionKey = (u32, u32, Position);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternNarrowingIndex {
    all_earth_shiftings: BTreeSet<u32>,
    all_nightlords: BTreeSet<u32>,
    poi_positions: BTreeMap<PatternKey, BTreeSet<Position>>,
    poi_types: BTreeMap<PatternKey, BTreeSet<PoiType>>,
    possible_types: BTreeMap<PositionKey, BTreeSet<PoiType>>,
}

impl PatternNarrowingIndex {
    pub fn build(patterns: &[MapPattern]) -> Self {
        let mut index = Self::default();

        for pattern in patterns {
            let (es, nightlord) = pattern.key();
            index.all_earth_shiftings.insert(es);
            index.all_nightlords.insert(nightlord);

            for construct in pattern.poi_constructs() {
                let kind = PoiType::Construct(construct.kind);
                index
                    .poi_positions
                    .entry((es, nightlord))
                    .or_default()
                    .insert(construct.pos);
                index
                    .poi_types
                    .entry((es, nightlord))
                    .or_default()
                    .insert(kind);
                index
                    .possible_types
                    .entry((es, nightlord, construct.pos))
                    .or_default()
                    .insert(kind);
            }
        }

        // A layout without any construct at a known POI position contributes `Empty`
        for (&(es, nightlord, pos), types) in index.possible_types.iter_mut() {
            index
                .poi_types
                .entry((es, nightlord))
                .or_default()
                .insert(PoiType::Empty);
            let has_gap = patterns
                .iter()
                .filter(|p| p.key() == (es, nightlord))
                .any(|p| !p.pos_constructions.contains_key(&pos));
            if has_gap {
                types.insert(PoiType::Empty);
            }
        }

        log::info!(
            "Built pattern index: {} patterns, {} key pairs, {} POI positions",
            patterns.len(),
            index.poi_positions.len(),
            index.possible_types.len()
        );
        index
    }

    pub fn all_earth_shiftings(&self) -> &BTreeSet<u32> {
        &self.all_earth_shiftings
    }

    pub fn all_nightlords(&self) -> &BTreeSet<u32> {
        &self.all_nightlords
    }

    /// Every POI position seen under a key pair
    pub fn poi_positions(&self, earth_shifting: u32, nightlord: u32) -> Option<&BTreeSet<Position>> {
        self.poi_positions.get(&(earth_shifting, nightlord))
    }

    /// Every POI type (including `Empty`) seen under a key pair
    pub fn poi_types(&self, earth_shifting: u32, nightlord: u32) -> Option<&BTreeSet<PoiType>> {
        self.poi_types.get(&(earth_shifting, nightlord))
    }

    /// Types a layout under the key pair may show at `pos`
    pub fn possible_types(
        &self,
        earth_shifting: u32,
        nightlord: u32,
        pos: Position,
    ) -> Option<&BTreeSet<PoiType>> {
        self.possible_types.get(&(earth_shifting, nightlord, pos))
    }

    /// Whether observing `kind` at `pos` is consistent with some layout
    pub fn is_possible(&self, earth_shifting: u32, nightlord: u32, pos: Position, kind: PoiType) -> bool {
        self.possible_types(earth_shifting, nightlord, pos)
            .is_some_and(|types| types.contains(&kind))
    }

    pub fn position_keys(&self) -> impl Iterator<Item = &PositionKey> {
        self.possible_types.keys()
    }
}

/// Patterns under a key pair that agree with every sighting
///
/// Each sighting is what was seen at a position, `PoiType::Empty` included.
pub fn narrow_patterns<'a>(
    patterns: &'a [MapPattern],
    earth_shifting: u32,
    nightlord: u32,
    sightings: &[(Position, PoiType)],
) -> Vec<&'a MapPattern> {
    patterns
        .iter()
        .filter(|p| p.key() == (earth_shifting, nightlord))
        .filter(|p| {
            sightings
                .iter()
                .all(|(pos, seen)| p.poi_type_at(pos) == *seen)
        })
        .collect()
}
