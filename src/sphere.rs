//! Spherical-to-Cartesian projection for the counting embedding.
//!
//! Points are embedded on a sphere of radius 0.5, where the chord length
//! between two directions separated by an angle `theta` is `sin(theta / 2)`.
//! Counting kernels receive these Cartesian coordinates alongside the raw
//! RA/Dec columns and may use either representation.

/// Radius of the Cartesian embedding sphere.
pub const EMBEDDING_RADIUS: f64 = 0.5;

/// Projects a single (RA, Dec) position in degrees onto the embedding sphere.
pub fn project_coordinates(ra_deg: f64, dec_deg: f64) -> [f64; 3] {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    [
        EMBEDDING_RADIUS * dec.cos() * ra.cos(),
        EMBEDDING_RADIUS * dec.cos() * ra.sin(),
        EMBEDDING_RADIUS * dec.sin(),
    ]
}

/// Projects RA/Dec columns (degrees) onto the embedding sphere.
pub fn project_points(ra_deg: &[f64], dec_deg: &[f64]) -> Vec<[f64; 3]> {
    debug_assert_eq!(ra_deg.len(), dec_deg.len());
    ra_deg
        .iter()
        .zip(dec_deg.iter())
        .map(|(&ra, &dec)| project_coordinates(ra, dec))
        .collect()
}

/// Maps angular bin edges (degrees) to squared chord lengths on the
/// embedding sphere: `sin^2(sep / 2)`.
///
/// Kernels that bin by squared chord distance avoid a trigonometric call
/// per pair; the mapping is monotonic so bin membership is unchanged.
pub fn project_bins(sep_deg: &[f64]) -> Vec<f64> {
    sep_deg
        .iter()
        .map(|&sep| {
            let half = 0.5 * sep.to_radians();
            half.sin() * half.sin()
        })
        .collect()
}

/// Recovers the angular separation in degrees from a chord length on the
/// embedding sphere.
pub fn chord_to_separation_deg(chord: f64) -> f64 {
    // The embedding radius is 0.5, so the chord equals sin(theta / 2).
    2.0 * chord.clamp(0.0, 1.0).asin().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_lands_on_the_half_radius_sphere() {
        for &(ra, dec) in &[(0.0, 0.0), (45.0, 30.0), (200.0, -60.0), (359.0, 89.0)] {
            let [x, y, z] = project_coordinates(ra, dec);
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - EMBEDDING_RADIUS).abs() < 1e-12, "({ra}, {dec}): r={r}");
        }
    }

    #[test]
    fn chord_roundtrips_through_separation() {
        for &sep in &[0.0, 0.1, 1.0, 30.0, 90.0, 179.0] {
            let chord = project_bins(&[sep])[0].sqrt();
            assert!((chord_to_separation_deg(chord) - sep).abs() < 1e-9);
        }
    }

    #[test]
    fn one_degree_apart_on_the_equator() {
        let a = project_coordinates(0.0, 0.0);
        let b = project_coordinates(1.0, 0.0);
        let chord = crate::util::math::chord_distance(a, b);
        assert!((chord_to_separation_deg(chord) - 1.0).abs() < 1e-9);
    }
}
