//! HEALPix tiles: identity, nested indexing, and boundary geometry.
//!
//! A [`Tile`] names one node of the hierarchical sky partition by its depth
//! (`order`) and its nested-scheme pixel index within that depth. Alignment
//! never walks the tree; tiles of any order compare through their absolute
//! spherical geometry, so catalogs partitioned at mixed depths work
//! uniformly.
//!
//! The nested indexing math follows the astrometry.net layout: base pixels
//! 0-3 cover the north polar cap, 4-7 the equatorial belt, 8-11 the south
//! polar cap, with bit-interleaved (x, y) sub-coordinates inside each base
//! pixel.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::util::math::angular_separation_deg;

/// One node of the hierarchical spatial partition of the sky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    /// Partition depth; order 0 has 12 pixels, each deeper order splits in 4.
    pub order: u8,
    /// Nested-scheme pixel index, unique within an order.
    pub index: u64,
}

impl Tile {
    /// Creates a tile handle; `index` must be below `npix(order)`.
    pub fn new(order: u8, index: u64) -> Self {
        debug_assert!(index < npix(order));
        Self { order, index }
    }

    /// Unit vector of the tile center.
    pub fn center(&self) -> [f64; 3] {
        let (base, x, y) = decompose_nested(self.index, self.order);
        let (lon, lat) = base_xy_to_lon_lat(
            base,
            x as f64 + 0.5,
            y as f64 + 0.5,
            nside(self.order) as f64,
        );
        lon_lat_to_unit(lon, lat)
    }

    /// Unit vectors sampled along the tile boundary: the four corners and
    /// the four edge midpoints.
    pub fn boundary(&self) -> [[f64; 3]; 8] {
        let (base, x, y) = decompose_nested(self.index, self.order);
        let ns = nside(self.order) as f64;
        let (x, y) = (x as f64, y as f64);
        let samples = [
            (x, y),
            (x + 0.5, y),
            (x + 1.0, y),
            (x + 1.0, y + 0.5),
            (x + 1.0, y + 1.0),
            (x + 0.5, y + 1.0),
            (x, y + 1.0),
            (x, y + 0.5),
        ];
        samples.map(|(sx, sy)| {
            let (lon, lat) = base_xy_to_lon_lat(base, sx, sy, ns);
            lon_lat_to_unit(lon, lat)
        })
    }

    /// Upper bound, in degrees, on the angular distance from the tile center
    /// to any point inside the tile.
    ///
    /// Boundary samples undersample the curved pixel edges, so the largest
    /// sampled distance is padded; the bound may overestimate but never
    /// underestimates, which is the direction alignment pruning requires.
    pub fn circumradius_deg(&self) -> f64 {
        let center = self.center();
        let max_sampled = self
            .boundary()
            .iter()
            .map(|&v| angular_separation_deg(center, v))
            .fold(0.0f64, f64::max);
        max_sampled * BOUNDARY_PADDING
    }

    /// Lower bound, in degrees, on the separation between any point of this
    /// tile and any point of `other`. Zero for overlapping bounds.
    pub fn min_separation_deg(&self, other: &Tile) -> f64 {
        let center_sep = angular_separation_deg(self.center(), other.center());
        (center_sep - self.circumradius_deg() - other.circumradius_deg()).max(0.0)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Norder={}/Npix={}", self.order, self.index)
    }
}

const BOUNDARY_PADDING: f64 = 1.25;

/// Nside for a given order: 2^order.
pub fn nside(order: u8) -> u64 {
    1u64 << order
}

/// Total number of pixels at a given order: 12 * nside^2.
pub fn npix(order: u8) -> u64 {
    12 * nside(order) * nside(order)
}

/// Tile containing the given (RA, Dec) position in degrees.
pub fn tile_for_radec(ra_deg: f64, dec_deg: f64, order: u8) -> Tile {
    let lon = ra_deg.to_radians();
    let lat = dec_deg.to_radians();
    let (base, x, y) = lon_lat_to_base_xy(lon, lat, nside(order) as f64);
    Tile::new(order, compose_nested(base, x, y, order))
}

fn lon_lat_to_unit(lon: f64, lat: f64) -> [f64; 3] {
    [
        lat.cos() * lon.cos(),
        lat.cos() * lon.sin(),
        lat.sin(),
    ]
}

fn is_north(base: u64) -> bool {
    base <= 3
}

fn is_south(base: u64) -> bool {
    base >= 8
}

/// Convert (lon, lat) in radians to (base pixel, x, y) grid coordinates.
fn lon_lat_to_base_xy(lon: f64, lat: f64, ns: f64) -> (u64, u64, u64) {
    let z = lat.sin();
    let mut phi = lon % TAU;
    if phi < 0.0 {
        phi += TAU;
    }

    let phi_t = phi % FRAC_PI_2;
    let column = ((phi / FRAC_PI_2).floor() as i64).rem_euclid(4) as u64;

    if z.abs() >= 2.0 / 3.0 {
        // Polar cap: eqns 19/20 of the HEALPix paper, solved for the
        // distance from the pole corner.
        let north = z >= 0.0;
        let zfactor = if north { 1.0 } else { -1.0 };

        let root_x = (1.0 - z * zfactor) * 3.0 * (ns * (2.0 * phi_t - PI) / PI).powi(2);
        let kx = if root_x <= 0.0 { 0.0 } else { root_x.sqrt() };
        let root_y = (1.0 - z * zfactor) * 3.0 * (ns * 2.0 * phi_t / PI).powi(2);
        let ky = if root_y <= 0.0 { 0.0 } else { root_y.sqrt() };

        let (xx, yy) = if north { (ns - kx, ns - ky) } else { (ky, kx) };

        let x = (xx.floor() as u64).min(ns as u64 - 1);
        let y = (yy.floor() as u64).min(ns as u64 - 1);
        let base = if north { column } else { 8 + column };
        (base, x, y)
    } else {
        // Equatorial belt: shear (z, phi) onto the diagonal base-pixel grid.
        let zunits = (z + 2.0 / 3.0) / (4.0 / 3.0);
        let phiunits = phi_t / FRAC_PI_2;

        let mut xx = (zunits + phiunits) * ns;
        let mut yy = (zunits - phiunits + 1.0) * ns;

        let base = if xx >= ns {
            xx -= ns;
            if yy >= ns {
                yy -= ns;
                column
            } else {
                ((column + 1) % 4) + 4
            }
        } else if yy >= ns {
            yy -= ns;
            column + 4
        } else {
            8 + column
        };

        let x = (xx.floor() as u64).min(ns as u64 - 1);
        let y = (yy.floor() as u64).min(ns as u64 - 1);
        (base, x, y)
    }
}

/// Convert (base pixel, x, y) continuous grid coordinates back to (lon, lat).
fn base_xy_to_lon_lat(base: u64, x: f64, y: f64, ns: f64) -> (f64, f64) {
    let x_norm = x / ns;
    let y_norm = y / ns;

    let in_polar_regime = if is_north(base) {
        (x_norm + y_norm) > 1.0
    } else if is_south(base) {
        (x_norm + y_norm) < 1.0
    } else {
        false
    };

    if !in_polar_regime {
        let (phi_off, z_off, chp) = if base <= 3 {
            (1.0, 0.0, base)
        } else if base <= 7 {
            (0.0, -1.0, base - 4)
        } else {
            (1.0, -2.0, base - 8)
        };

        let z = (2.0 / 3.0) * (x_norm + y_norm + z_off);
        let phi = FRAC_PI_4 * (x_norm - y_norm + phi_off + 2.0 * chp as f64);
        (wrap_lon(phi), z.clamp(-1.0, 1.0).asin())
    } else {
        let north = is_north(base);
        let zfactor = if north { 1.0 } else { -1.0 };
        let (px, py) = if north { (x, y) } else { (ns - y, ns - x) };

        let kx = ns - px;
        let ky = ns - py;
        let phi_t = if kx + ky == 0.0 {
            0.0
        } else {
            PI * ky / (2.0 * (kx + ky))
        };

        let z = if phi_t < FRAC_PI_4 {
            let denom = (2.0 * phi_t - PI) * ns;
            if denom.abs() < 1e-15 {
                zfactor
            } else {
                let val = PI * kx / denom;
                (1.0 - val * val / 3.0) * zfactor
            }
        } else {
            let denom = 2.0 * phi_t * ns;
            if denom.abs() < 1e-15 {
                zfactor
            } else {
                let val = PI * ky / denom;
                (1.0 - val * val / 3.0) * zfactor
            }
        };

        let base_col = if is_south(base) { base - 8 } else { base };
        let phi = FRAC_PI_2 * base_col as f64 + phi_t;
        (wrap_lon(phi), z.clamp(-1.0, 1.0).asin())
    }
}

fn wrap_lon(mut lon: f64) -> f64 {
    if lon < 0.0 {
        lon += TAU;
    }
    if lon >= TAU {
        lon -= TAU;
    }
    lon
}

fn compose_nested(base: u64, x: u64, y: u64, order: u8) -> u64 {
    let ns2 = nside(order) * nside(order);
    base * ns2 + xy_to_nested_sub(x, y)
}

fn decompose_nested(index: u64, order: u8) -> (u64, u64, u64) {
    let ns2 = nside(order) * nside(order);
    let (x, y) = nested_sub_to_xy(index % ns2);
    (index / ns2, x, y)
}

/// Bit-interleave (x, y): x fills the even bits, y the odd bits.
fn xy_to_nested_sub(x: u64, y: u64) -> u64 {
    let mut result = 0u64;
    let (mut xx, mut yy) = (x, y);
    let mut bit = 0;
    while xx > 0 || yy > 0 {
        result |= (xx & 1) << bit;
        result |= (yy & 1) << (bit + 1);
        xx >>= 1;
        yy >>= 1;
        bit += 2;
    }
    result
}

fn nested_sub_to_xy(sub: u64) -> (u64, u64) {
    let (mut x, mut y) = (0u64, 0u64);
    let mut s = sub;
    let mut bit = 0;
    while s > 0 {
        x |= (s & 1) << bit;
        s >>= 1;
        y |= (s & 1) << bit;
        s >>= 1;
        bit += 1;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_interleave_roundtrip() {
        for x in 0..32 {
            for y in 0..32 {
                let sub = xy_to_nested_sub(x, y);
                assert_eq!(nested_sub_to_xy(sub), (x, y));
            }
        }
    }

    #[test]
    fn tile_for_radec_stays_in_range() {
        for order in 0..6 {
            for i in 0..200 {
                let ra = 360.0 * (i as f64) / 200.0;
                let dec = -89.0 + 178.0 * (i as f64) / 200.0;
                let tile = tile_for_radec(ra, dec, order);
                assert!(tile.index < npix(order));
            }
        }
    }

    #[test]
    fn center_lies_inside_own_tile() {
        for order in 1..5 {
            for index in 0..npix(order) {
                let tile = Tile::new(order, index);
                let [x, y, z] = tile.center();
                let ra = y.atan2(x).to_degrees().rem_euclid(360.0);
                let dec = z.clamp(-1.0, 1.0).asin().to_degrees();
                assert_eq!(tile_for_radec(ra, dec, order), tile);
            }
        }
    }

    #[test]
    fn circumradius_covers_member_points() {
        // Every point assigned to a tile must sit within the claimed bound.
        for order in [1u8, 2, 3] {
            for i in 0..500 {
                let ra = 360.0 * (i as f64) / 500.0;
                let dec = -85.0 + 170.0 * ((i * 7 % 500) as f64) / 500.0;
                let tile = tile_for_radec(ra, dec, order);
                let point = lon_lat_to_unit(ra.to_radians(), dec.to_radians());
                let dist = angular_separation_deg(tile.center(), point);
                assert!(
                    dist <= tile.circumradius_deg() + 1e-9,
                    "order {order}: point ({ra}, {dec}) at {dist} deg exceeds \
                     bound {} of {tile}",
                    tile.circumradius_deg()
                );
            }
        }
    }

    #[test]
    fn min_separation_is_a_lower_bound() {
        // Distinct far-apart tiles must report a positive bound no larger
        // than the true distance between their member points.
        let a = tile_for_radec(10.0, 10.0, 2);
        let b = tile_for_radec(190.0, -10.0, 2);
        let bound = a.min_separation_deg(&b);
        assert!(bound > 0.0);
        let pa = lon_lat_to_unit(10.0f64.to_radians(), 10.0f64.to_radians());
        let pb = lon_lat_to_unit(190.0f64.to_radians(), (-10.0f64).to_radians());
        assert!(bound <= angular_separation_deg(pa, pb));
    }

    #[test]
    fn display_uses_catalog_path_naming() {
        assert_eq!(Tile::new(1, 44).to_string(), "Norder=1/Npix=44");
    }
}
