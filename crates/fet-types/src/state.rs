// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;

/// 1D evaluation grid along the expansion axis.
/// Equivalent of `np.linspace(z_min, z_max, n)`.
#[derive(Debug, Clone)]
pub struct AxialGrid {
    pub n: usize,
    pub z: Array1<f64>, // node coordinates [n], endpoints included
    pub dz: f64,        // node spacing
    pub z_min: f64,
    pub z_max: f64,
}

impl AxialGrid {
    pub fn new(n: usize, z_min: f64, z_max: f64) -> Self {
        let z = Array1::linspace(z_min, z_max, n);
        let dz = if n > 1 { z[1] - z[0] } else { z_max - z_min };
        AxialGrid {
            n,
            z,
            dz,
            z_min,
            z_max,
        }
    }

    /// Width of the grid window.
    pub fn span(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// Reconstructed flux shape sampled on an [`AxialGrid`].
#[derive(Debug, Clone)]
pub struct FluxProfile {
    pub z: Array1<f64>,
    pub phi: Array1<f64>,
}

impl FluxProfile {
    pub fn new(z: Array1<f64>, phi: Array1<f64>) -> Self {
        debug_assert_eq!(z.len(), phi.len());
        FluxProfile { z, phi }
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// (z, φ) of the largest sample, if any.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .zip(self.phi.iter())
            .filter(|(_, p)| p.is_finite())
            .fold(None, |best: Option<(f64, f64)>, (&z, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((z, p)),
            })
    }

    /// (min, max) of φ, ignoring non-finite samples.
    pub fn range(&self) -> (f64, f64) {
        self.phi
            .iter()
            .filter(|p| p.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints() {
        let grid = AxialGrid::new(1000, -10.0, 10.0);
        assert_eq!(grid.z.len(), 1000);
        assert!((grid.z[0] + 10.0).abs() < 1e-12);
        assert!((grid.z[999] - 10.0).abs() < 1e-12);
        assert!((grid.dz - 20.0 / 999.0).abs() < 1e-12);
        assert!((grid.span() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_grid() {
        let grid = AxialGrid::new(1, 0.0, 4.0);
        assert_eq!(grid.z.len(), 1);
        assert!((grid.dz - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_profile_peak_and_range() {
        let z = Array1::linspace(-1.0, 1.0, 5);
        let phi = Array1::from(vec![1.0, 3.0, 2.0, f64::NAN, 0.5]);
        let profile = FluxProfile::new(z, phi);
        let (zp, pp) = profile.peak().unwrap();
        assert!((zp + 0.5).abs() < 1e-12);
        assert!((pp - 3.0).abs() < 1e-12);
        assert_eq!(profile.range(), (0.5, 3.0));
    }

    #[test]
    fn test_empty_profile() {
        let profile = FluxProfile::new(Array1::zeros(0), Array1::zeros(0));
        assert!(profile.is_empty());
        assert!(profile.peak().is_none());
    }
}
