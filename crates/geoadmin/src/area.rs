//! Administrative areas and the containment hierarchy

use crate::error::{GeoError, Result};
use crate::resolver::GeoData;
use crate::store::AreaRow;
use once_cell::unsync::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Rank in the administrative containment hierarchy.
///
/// Level 0 is the country tier; a higher number means a smaller, more local
/// region. Raw integers from callers are normalized through `TryFrom`,
/// which rejects out-of-range values before any query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Country = 0,
    Admin1 = 1,
    Admin2 = 2,
    Admin3 = 3,
    Admin4 = 4,
    Admin5 = 5,
}

impl Level {
    /// Number of levels in the hierarchy
    pub const COUNT: usize = 6;

    /// Slot of this level in an area's ancestor-id vector
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i64> for Level {
    type Error = GeoError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Level::Country),
            1 => Ok(Level::Admin1),
            2 => Ok(Level::Admin2),
            3 => Ok(Level::Admin3),
            4 => Ok(Level::Admin4),
            5 => Ok(Level::Admin5),
            other => Err(GeoError::InvalidLevel(other)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Country => write!(f, "country"),
            Level::Admin1 => write!(f, "admin1"),
            Level::Admin2 => write!(f, "admin2"),
            Level::Admin3 => write!(f, "admin3"),
            Level::Admin4 => write!(f, "admin4"),
            Level::Admin5 => write!(f, "admin5"),
        }
    }
}

/// Bounding box of an area's shape.
///
/// Present only when all four bounds are stored; a partially stored box is
/// treated as absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// One administrative region, backed by the store that produced it.
///
/// Constructed only by the resolver from a store row; immutable except for
/// the lazily-loaded alias-name cache. Equality and hashing use the
/// identifier alone. The borrow of the owning [`GeoData`] keeps an `Area`
/// from outliving its store.
pub struct Area<'g> {
    geodata: &'g GeoData,
    id: i64,
    name: String,
    level: Level,
    latitude: Option<f64>,
    longitude: Option<f64>,
    levels: [Option<i64>; 6],
    bounds: Option<Bounds>,
    names: OnceCell<HashSet<String>>,
}

impl<'g> Area<'g> {
    /// Build an area from a store row, validating its level vector.
    ///
    /// The last non-null ancestor slot must be the row's own level, and the
    /// slots below it must form an unbroken chain; anything else is corrupt
    /// published data, not a lookup miss.
    pub(crate) fn from_row(geodata: &'g GeoData, row: AreaRow) -> Result<Area<'g>> {
        let level = Level::try_from(row.level).map_err(|_| {
            GeoError::corrupt(format!(
                "area {} has level {} outside the known hierarchy",
                row.id, row.level
            ))
        })?;

        let last = row.levels.iter().rposition(|slot| slot.is_some());
        if last != Some(level.index()) {
            return Err(GeoError::corrupt(format!(
                "area {}: level vector does not end at its own level ({})",
                row.id, level
            )));
        }
        if row.levels[..level.index()].iter().any(|slot| slot.is_none()) {
            return Err(GeoError::corrupt(format!(
                "area {}: level vector has a gap below its own level ({})",
                row.id, level
            )));
        }

        Ok(Area {
            geodata,
            id: row.id,
            name: row.name,
            level,
            latitude: row.latitude,
            longitude: row.longitude,
            levels: row.levels,
            bounds: row
                .bounds
                .map(|(min_x, max_x, min_y, max_y)| Bounds {
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                }),
            names: OnceCell::new(),
        })
    }

    /// Stable identifier, unique within the dataset
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Canonical name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Administrative level
    pub fn level(&self) -> Level {
        self.level
    }

    /// Centroid latitude, if stored
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Centroid longitude, if stored
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Bounding box, if fully stored
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Ancestor-id chain from the country tier down to this area's level;
    /// slots beyond the area's own level are `None`
    pub fn levels(&self) -> &[Option<i64>; 6] {
        &self.levels
    }

    /// All alias names of this area, including the canonical name.
    ///
    /// Loaded from the store on first access and cached for the lifetime of
    /// this value.
    pub fn alias_names(&self) -> Result<&HashSet<String>> {
        self.names.get_or_try_init(|| {
            let mut names = self.geodata.store().alias_names(self.id)?;
            names.insert(self.name.clone());
            Ok(names)
        })
    }

    /// The parent of this area in the containment hierarchy.
    ///
    /// With no level, returns the nearest ancestor strictly above this
    /// area's own level, scanning from the most local tier downward. With
    /// an explicit level, returns the ancestor at exactly that level;
    /// `None` when that slot is empty or the level is the area's own (an
    /// area is never its own parent).
    pub fn parent_area(&self, level: Option<Level>) -> Result<Option<Area<'g>>> {
        match level {
            None => {
                for index in (0..Level::COUNT).rev() {
                    if index == self.level.index() || self.levels[index].is_none() {
                        continue;
                    }
                    return self.ancestor_at(index);
                }
                Ok(None)
            }
            Some(level) => {
                let index = level.index();
                if index == self.level.index() || self.levels[index].is_none() {
                    return Ok(None);
                }
                self.ancestor_at(index)
            }
        }
    }

    /// Reconstruct the ancestor at `index` by re-querying the store on the
    /// level-vector prefix up to and including that slot.
    fn ancestor_at(&self, index: usize) -> Result<Option<Area<'g>>> {
        let prefix = self.levels[..=index]
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    GeoError::corrupt(format!(
                        "area {}: ancestor slot {} is empty below slot {}",
                        self.id, i, index
                    ))
                })
            })
            .collect::<Result<Vec<i64>>>()?;

        match self.geodata.store().area_by_level_prefix(&prefix)? {
            Some(row) => Ok(Some(Area::from_row(self.geodata, row)?)),
            None => Ok(None),
        }
    }
}

impl PartialEq for Area<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Area<'_> {}

impl Hash for Area<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Area<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
