//! Map pattern reference data

use std::collections::BTreeMap;

/// Point on the standard 750x750 map
pub type Position = (i32, i32);

/// Construct type prefixes that identify a point of interest
pub const POI_CONSTRUCTS: [u32; 14] = [
    30, 32, 34, 37, 38, 40, 41, 50, 51, 52, 5358, 5359, 5367, 5368,
];

/// Earth shifting variant with an underground layer (the great hollow)
pub const GREAT_HOLLOW: u32 = 4;

/// Position indices of the great hollow's underground area
pub const GREAT_HOLLOW_UNDERGROUND_INDICES: [u32; 7] = [1160, 1159, 1107, 1110, 1153, 1175, 1174];

/// What can be observed at a POI position
///
/// `Empty` means the layout has no construct there, which is as informative
/// as seeing a specific construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoiType {
    Empty,
    Construct(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construct {
    pub kind: u32,
    pub is_display: bool,
    pub is_underground: bool,
    pub pos_index: u32,
    pub pos: Position,
}

impl Construct {
    pub fn new(kind: u32, pos_index: u32, pos: Position, is_display: bool) -> Self {
        Self {
            kind,
            is_display,
            is_underground: GREAT_HOLLOW_UNDERGROUND_INDICES.contains(&pos_index),
            pos_index,
            pos,
        }
    }

    /// Decimal prefix match against the POI category list
    pub fn is_poi(&self) -> bool {
        let kind = self.kind.to_string();
        POI_CONSTRUCTS
            .iter()
            .any(|prefix| kind.starts_with(&prefix.to_string()))
    }
}

/// One pre-enumerated map layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapPattern {
    pub id: u32,
    pub nightlord: u32,
    pub earth_shifting: u32,
    pub day1_boss: u32,
    pub day1_extra_boss: i32,
    pub day1_pos: Position,
    pub day2_boss: u32,
    pub day2_extra_boss: i32,
    pub day2_pos: Position,
    pub day2_pos_idx: u32,
    pub treasure: u32,
    pub rot_rew: u32,
    pub event_value: i32,
    pub event_flag: i32,
    pub evpat_value: i32,
    pub evpat_flag: i32,
    pub pos_constructions: BTreeMap<Position, Construct>,
}

impl MapPattern {
    pub fn new(id: u32, earth_shifting: u32, nightlord: u32) -> Self {
        Self {
            id,
            earth_shifting,
            nightlord,
            ..Self::default()
        }
    }

    pub fn with_construct(mut self, construct: Construct) -> Self {
        self.pos_constructions.insert(construct.pos, construct);
        self
    }

    /// `(earth_shifting, nightlord)` grouping key
    pub fn key(&self) -> (u32, u32) {
        (self.earth_shifting, self.nightlord)
    }

    /// Constructs that can be used to tell layouts apart
    pub fn poi_constructs(&self) -> impl Iterator<Item = &Construct> {
        self.pos_constructions
            .values()
            .filter(|c| c.is_poi() && !(self.earth_shifting == GREAT_HOLLOW && c.is_underground))
    }

    /// What an observer would see at `pos` in this layout
    pub fn poi_type_at(&self, pos: &Position) -> PoiType {
        match self.pos_constructions.get(pos) {
            Some(construct) => PoiType::Construct(construct.kind),
            None => PoiType::Empty,
        }
    }
}
