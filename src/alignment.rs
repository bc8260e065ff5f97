//! Tile alignment: which tile pairs must be counted against each other.
//!
//! Auto alignment enumerates the upper triangle of the tile x tile matrix:
//! every unordered pair of distinct tiles exactly once, never the diagonal.
//! Same-tile pairs go through the dedicated same-tile counting path, so no
//! point pair can be counted twice. Cross alignment is the full Cartesian
//! product of the two tile lists.
//!
//! Pruning drops a pair only when the geometric lower bound on its point
//! separations already exceeds the largest separation of interest; the
//! bound over-estimates reach, never under-estimates it, so pruning can
//! only skip pairs that provably contribute nothing.

use crate::catalog::TileInfo;
use crate::tile::Tile;
use crate::trace::{trace_event, trace_span};
use crate::util::{CorrSkyError, CorrSkyResult};

/// One aligned tile pair: a future cross-counting task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TilePair {
    pub left: Tile,
    pub right: Tile,
}

/// Aligns a catalog against itself.
///
/// Returns every unordered pair of distinct tiles, `C(n, 2)` pairs without
/// pruning. With `max_separation_deg` set, pairs whose separation lower
/// bound exceeds the maximum are dropped; if that eliminates every
/// candidate the parameters cannot produce a measurement and the call
/// fails with [`CorrSkyError::NoOverlap`] instead of returning silence.
pub fn align_auto(
    tiles: &[TileInfo],
    max_separation_deg: Option<f64>,
) -> CorrSkyResult<Vec<TilePair>> {
    let _span = trace_span!("align_auto", tiles = tiles.len()).entered();

    let mut pairs = Vec::new();
    let mut candidates = 0usize;
    for (i, left) in tiles.iter().enumerate() {
        for right in &tiles[i + 1..] {
            candidates += 1;
            if keep(&left.tile, &right.tile, max_separation_deg) {
                pairs.push(TilePair {
                    left: left.tile,
                    right: right.tile,
                });
            }
        }
    }

    if pairs.is_empty() && candidates > 0 {
        if let Some(max_separation_deg) = max_separation_deg {
            return Err(CorrSkyError::NoOverlap { max_separation_deg });
        }
    }

    trace_event!("aligned", pairs = pairs.len(), pruned = candidates - pairs.len());
    Ok(pairs)
}

/// Aligns two catalogs: the full `|left| x |right|` product, with the same
/// optional conservative pruning. Identical tiles pair up too; across two
/// catalogs the diagonal holds distinct point sets.
pub fn align_cross(
    left: &[TileInfo],
    right: &[TileInfo],
    max_separation_deg: Option<f64>,
) -> Vec<TilePair> {
    let _span = trace_span!("align_cross", left = left.len(), right = right.len()).entered();

    let mut pairs = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            if keep(&l.tile, &r.tile, max_separation_deg) {
                pairs.push(TilePair {
                    left: l.tile,
                    right: r.tile,
                });
            }
        }
    }

    trace_event!("aligned", pairs = pairs.len());
    pairs
}

fn keep(left: &Tile, right: &Tile, max_separation_deg: Option<f64>) -> bool {
    match max_separation_deg {
        Some(max) => left.min_separation_deg(right) < max,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_infos(tiles: &[Tile]) -> Vec<TileInfo> {
        tiles.iter().map(|&tile| TileInfo { tile, rows: 1 }).collect()
    }

    #[test]
    fn auto_alignment_is_the_upper_triangle() {
        let tiles = tile_infos(&[Tile::new(1, 0), Tile::new(1, 3), Tile::new(2, 17)]);
        let pairs = align_auto(&tiles, None).unwrap();
        assert_eq!(pairs.len(), 3);
        for pair in &pairs {
            assert_ne!(pair.left, pair.right);
        }
    }

    #[test]
    fn single_tile_aligns_to_nothing() {
        let tiles = tile_infos(&[Tile::new(0, 4)]);
        assert!(align_auto(&tiles, None).unwrap().is_empty());
        assert!(align_auto(&tiles, Some(0.1)).unwrap().is_empty());
    }

    #[test]
    fn cross_alignment_is_the_full_product() {
        let left = tile_infos(&[Tile::new(1, 0), Tile::new(1, 1)]);
        let right = tile_infos(&[Tile::new(1, 0), Tile::new(1, 5), Tile::new(1, 9)]);
        let pairs = align_cross(&left, &right, None);
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn pruning_everything_fails_loudly() {
        // Two far-apart order-2 tiles and a maximum separation far below
        // their distance.
        let a = crate::tile::tile_for_radec(10.0, 0.0, 2);
        let b = crate::tile::tile_for_radec(190.0, 0.0, 2);
        let tiles = tile_infos(&[a, b]);
        let err = align_auto(&tiles, Some(1e-3)).unwrap_err();
        assert_eq!(
            err,
            CorrSkyError::NoOverlap {
                max_separation_deg: 1e-3
            }
        );
    }
}
