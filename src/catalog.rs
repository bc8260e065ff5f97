//! Catalog access interface and an in-memory implementation.
//!
//! The partitioned catalog store is an external collaborator: this crate
//! only ever lists tiles, loads one tile's points as numeric columns, and
//! asks for the total row count. [`MemoryCatalog`] implements the interface
//! for tests, benches and small in-process datasets.

use std::collections::{BTreeMap, BTreeSet};

use crate::tile::{tile_for_radec, Tile};
use crate::util::{CorrSkyError, CorrSkyResult};

/// Column name for right ascension, degrees.
pub const RA_COLUMN: &str = "ra";
/// Column name for declination, degrees.
pub const DEC_COLUMN: &str = "dec";

/// A tile of a catalog together with its declared row count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInfo {
    pub tile: Tile,
    pub rows: u64,
}

/// One tile's points as a column-major numeric table.
///
/// RA and Dec are always present; weight, redshift or any other per-point
/// quantity travels as a named extra column of the same length.
#[derive(Clone, Debug)]
pub struct PointBatch {
    ra: Vec<f64>,
    dec: Vec<f64>,
    extra: BTreeMap<String, Vec<f64>>,
}

impl PointBatch {
    /// Creates a batch from coordinate columns of equal length.
    ///
    /// Panics when the columns differ in length.
    pub fn new(ra: Vec<f64>, dec: Vec<f64>) -> Self {
        assert_eq!(ra.len(), dec.len(), "coordinate columns differ in length");
        Self {
            ra,
            dec,
            extra: BTreeMap::new(),
        }
    }

    /// Attaches a named extra column; length must match the coordinates.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), self.len(), "extra column differs in length");
        self.extra.insert(name.into(), values);
        self
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    pub fn ra(&self) -> &[f64] {
        &self.ra
    }

    pub fn dec(&self) -> &[f64] {
        &self.dec
    }

    /// Looks up a column by name; coordinates resolve like any other column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            RA_COLUMN => Some(&self.ra),
            DEC_COLUMN => Some(&self.dec),
            _ => self.extra.get(name).map(Vec::as_slice),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names of the extra columns (coordinates excluded).
    pub fn extra_columns(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }
}

/// Read-only view of a spatially partitioned catalog.
///
/// Implementations must be safe to query from concurrent counting tasks;
/// nothing in this crate ever mutates catalog data.
pub trait SkyCatalog: Sync {
    /// Human-readable catalog name, used in error messages.
    fn name(&self) -> &str;

    /// The tiles forming the catalog's disjoint sky cover.
    fn tiles(&self) -> &[TileInfo];

    /// Total number of points over all tiles.
    fn total_rows(&self) -> u64;

    /// Whether every tile of the catalog carries the named column.
    fn has_column(&self, column: &str) -> bool;

    /// Loads one tile's points.
    fn load_tile(&self, tile: Tile) -> CorrSkyResult<PointBatch>;
}

/// An in-memory [`SkyCatalog`].
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    name: String,
    tiles: Vec<TileInfo>,
    batches: BTreeMap<Tile, PointBatch>,
    columns: BTreeSet<String>,
    total_rows: u64,
}

impl MemoryCatalog {
    /// An empty catalog with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a catalog by assigning loose points to tiles at a fixed order.
    pub fn from_points(name: impl Into<String>, order: u8, ra: &[f64], dec: &[f64]) -> Self {
        Self::from_columns(name, order, ra, dec, &[])
    }

    /// Like [`MemoryCatalog::from_points`], carrying extra columns along.
    pub fn from_columns(
        name: impl Into<String>,
        order: u8,
        ra: &[f64],
        dec: &[f64],
        extra: &[(&str, &[f64])],
    ) -> Self {
        assert_eq!(ra.len(), dec.len(), "coordinate columns differ in length");
        for (column, values) in extra {
            assert_eq!(values.len(), ra.len(), "column '{column}' differs in length");
        }

        let mut by_tile: BTreeMap<Tile, Vec<usize>> = BTreeMap::new();
        for (i, (&r, &d)) in ra.iter().zip(dec.iter()).enumerate() {
            by_tile.entry(tile_for_radec(r, d, order)).or_default().push(i);
        }

        let mut catalog = Self::new(name);
        for (tile, rows) in by_tile {
            let pick = |column: &[f64]| rows.iter().map(|&i| column[i]).collect::<Vec<f64>>();
            let mut batch = PointBatch::new(pick(ra), pick(dec));
            for (column, values) in extra {
                batch = batch.with_column(*column, pick(values));
            }
            catalog.insert_tile(tile, batch);
        }
        catalog
    }

    /// Adds (or replaces) a tile and its points.
    pub fn insert_tile(&mut self, tile: Tile, batch: PointBatch) {
        let columns: BTreeSet<String> = batch
            .extra_columns()
            .map(str::to_owned)
            .collect();
        if self.batches.is_empty() {
            self.columns = columns;
        } else {
            // A column only counts as present when every tile carries it.
            self.columns = self.columns.intersection(&columns).cloned().collect();
        }

        let rows = batch.len() as u64;
        if let Some(previous) = self.batches.insert(tile, batch) {
            self.total_rows -= previous.len() as u64;
            self.tiles.retain(|info| info.tile != tile);
        }
        self.total_rows += rows;
        self.tiles.push(TileInfo { tile, rows });
        self.tiles.sort_by_key(|info| info.tile);
    }
}

impl SkyCatalog for MemoryCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn tiles(&self) -> &[TileInfo] {
        &self.tiles
    }

    fn total_rows(&self) -> u64 {
        self.total_rows
    }

    fn has_column(&self, column: &str) -> bool {
        column == RA_COLUMN || column == DEC_COLUMN || self.columns.contains(column)
    }

    fn load_tile(&self, tile: Tile) -> CorrSkyResult<PointBatch> {
        self.batches
            .get(&tile)
            .cloned()
            .ok_or_else(|| CorrSkyError::Counting {
                label: "load",
                left: tile,
                right: None,
                reason: format!("tile is not present in catalog '{}'", self.name),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_partitions_disjointly() {
        let ra = [10.0, 11.0, 190.0, 200.0, 12.0];
        let dec = [5.0, 6.0, -40.0, -45.0, 5.5];
        let catalog = MemoryCatalog::from_points("test", 1, &ra, &dec);

        assert_eq!(catalog.total_rows(), 5);
        let loaded: usize = catalog
            .tiles()
            .iter()
            .map(|info| catalog.load_tile(info.tile).unwrap().len())
            .sum();
        assert_eq!(loaded, 5);
    }

    #[test]
    fn column_presence_requires_every_tile() {
        let mut catalog = MemoryCatalog::new("mixed");
        catalog.insert_tile(
            Tile::new(0, 0),
            PointBatch::new(vec![1.0], vec![1.0]).with_column("wei", vec![0.5]),
        );
        catalog.insert_tile(Tile::new(0, 1), PointBatch::new(vec![100.0], vec![1.0]));

        assert!(catalog.has_column("ra"));
        assert!(!catalog.has_column("wei"));
    }

    #[test]
    fn loading_an_absent_tile_names_it() {
        let catalog = MemoryCatalog::new("empty");
        let err = catalog.load_tile(Tile::new(2, 7)).unwrap_err();
        assert!(matches!(err, CorrSkyError::Counting { left, .. } if left == Tile::new(2, 7)));
    }
}
