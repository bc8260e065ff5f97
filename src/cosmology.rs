//! Redshift-to-comoving-distance conversion.
//!
//! A flat parameter bundle plus a line-of-sight FLRW integral, evaluated
//! with composite Simpson quadrature. With `h0 = 100` the distances come
//! out in Mpc/h, the unit the projected and redshift-space bin edges use.

/// Speed of light in km/s.
const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Number of Simpson intervals per distance evaluation (must be even).
const INTEGRATION_STEPS: usize = 256;

/// Cosmological parameters for distance conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cosmology {
    /// Hubble constant, km/s/Mpc. 100 yields distances in Mpc/h.
    pub h0: f64,
    /// Matter density parameter.
    pub omega_m: f64,
    /// Dark-energy density parameter.
    pub omega_l: f64,
}

impl Default for Cosmology {
    fn default() -> Self {
        Self {
            h0: 100.0,
            omega_m: 0.25,
            omega_l: 0.75,
        }
    }
}

impl Cosmology {
    /// Line-of-sight comoving distance to redshift `z`, in Mpc (Mpc/h for
    /// `h0 = 100`). Non-positive redshifts map to distance zero.
    pub fn comoving_distance(&self, z: f64) -> f64 {
        if z <= 0.0 {
            return 0.0;
        }
        let omega_k = 1.0 - self.omega_m - self.omega_l;
        let integrand = |z: f64| {
            let zp1 = 1.0 + z;
            1.0 / (self.omega_m * zp1.powi(3) + omega_k * zp1 * zp1 + self.omega_l).sqrt()
        };

        let h = z / INTEGRATION_STEPS as f64;
        let mut sum = integrand(0.0) + integrand(z);
        for i in 1..INTEGRATION_STEPS {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * integrand(h * i as f64);
        }
        let integral = sum * h / 3.0;
        SPEED_OF_LIGHT_KM_S / self.h0 * integral
    }

    /// Comoving distances for a redshift column.
    pub fn comoving_distances(&self, redshifts: &[f64]) -> Vec<f64> {
        redshifts.iter().map(|&z| self.comoving_distance(z)).collect()
    }
}
