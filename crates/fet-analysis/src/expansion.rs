// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Expansion Reconstruction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Flux shape from spatial Legendre tally moments.
//!
//! The tally scores m_n = ∫ φ(z) P_n(x(z)) dz over the window [min, max].
//! Orthogonality, ∫_{-1}^{1} P_n P_k dx = 2/(2n+1) δ_nk, gives
//!   φ(z) = Σ a_n / h · P_n(x(z)),   a_n = (2n+1)/2 · m_n,
//! with h = (max − min)/2 the half width of the window.

use fet_math::legendre::LegendreSeries;
use fet_math::quadrature::{simpson, trapezoid_xy};
use fet_model::ExpansionWindow;
use fet_types::error::{FetError, FetResult};
use fet_types::state::{AxialGrid, FluxProfile};
use serde::{Deserialize, Serialize};

/// Simpson intervals used by [`check_integral`].
pub const INTEGRAL_INTERVALS: usize = 1000;

/// a_n = (2n+1)/2 · m_n.
pub fn scale_moments(moments: &[f64]) -> Vec<f64> {
    moments
        .iter()
        .enumerate()
        .map(|(n, m)| (2.0 * n as f64 + 1.0) / 2.0 * m)
        .collect()
}

/// Truncated series φ(z) on the window of the expansion filter.
///
/// Needs at least `window.order + 1` moments; extra ones are dropped.
pub fn reconstruct(moments: &[f64], window: &ExpansionWindow) -> FetResult<LegendreSeries> {
    let needed = window.order + 1;
    if moments.len() < needed {
        return Err(FetError::MissingMoments(format!(
            "order {} expansion needs {needed} moments, got {}",
            window.order,
            moments.len()
        )));
    }
    if moments.len() > needed {
        log::warn!(
            "Dropping {} moments above order {}",
            moments.len() - needed,
            window.order
        );
    }
    let half_width = window.half_width();
    let coefficients: Vec<f64> = scale_moments(&moments[..needed])
        .into_iter()
        .map(|a| a / half_width)
        .collect();
    LegendreSeries::new(coefficients, (window.minimum, window.maximum))
}

pub fn evaluate_profile(series: &LegendreSeries, grid: &AxialGrid) -> FluxProfile {
    FluxProfile::new(grid.z.clone(), series.eval_many(&grid.z))
}

/// Integral of the reconstruction compared against the zeroth moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegralCheck {
    /// Composite Simpson over the series domain.
    pub integral: f64,
    /// (b − a) · c_0.
    pub exact: f64,
    pub zeroth_moment: f64,
    pub relative_difference: f64,
    pub tolerance: f64,
    pub passed: bool,
}

pub fn check_integral(
    series: &LegendreSeries,
    moments: &[f64],
    tolerance: f64,
) -> FetResult<IntegralCheck> {
    let m0 = *moments
        .first()
        .ok_or_else(|| FetError::MissingMoments("no zeroth moment".to_string()))?;
    let (a, b) = series.domain();
    let integral = simpson(|z| series.eval(z), a, b, INTEGRAL_INTERVALS);
    if !integral.is_finite() {
        return Err(FetError::Numerical(format!(
            "profile integral is not finite: {integral}"
        )));
    }
    let relative_difference = relative_difference(integral, m0);
    let passed = relative_difference <= tolerance;
    if passed {
        log::info!("∫φ dz = {integral:.6}, m_0 = {m0:.6} (rel. diff {relative_difference:.2e})");
    } else {
        log::warn!(
            "∫φ dz = {integral:.6} differs from m_0 = {m0:.6} by {relative_difference:.2e} (tol {tolerance:.1e})"
        );
    }
    Ok(IntegralCheck {
        integral,
        exact: series.integral(),
        zeroth_moment: m0,
        relative_difference,
        tolerance,
        passed,
    })
}

/// Trapezoid integral of a sampled profile.
pub fn profile_integral(profile: &FluxProfile) -> FetResult<f64> {
    let z = profile.z.to_vec();
    let phi = profile.phi.to_vec();
    trapezoid_xy(&z, &phi)
}

/// |x − reference| / |reference|, or |x| when the reference is zero.
fn relative_difference(x: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        x.abs()
    } else {
        (x - reference).abs() / reference.abs()
    }
}

/// Profile of one truncation order.
#[derive(Debug, Clone)]
pub struct ConvergenceStep {
    pub order: usize,
    pub profile: FluxProfile,
    /// max |φ_k − φ_{k−1}| over the grid; zero for k = 0.
    pub max_change: f64,
}

/// Profiles for every truncation order 0..=N of the reconstruction.
pub fn order_convergence(
    moments: &[f64],
    window: &ExpansionWindow,
    grid: &AxialGrid,
) -> FetResult<Vec<ConvergenceStep>> {
    let full = reconstruct(moments, window)?;
    let mut steps: Vec<ConvergenceStep> = Vec::with_capacity(full.order() + 1);
    for order in 0..=full.order() {
        let profile = evaluate_profile(&full.truncate(order), grid);
        let max_change = match steps.last() {
            Some(prev) => (&profile.phi - &prev.profile.phi)
                .iter()
                .fold(0.0f64, |acc, d| acc.max(d.abs())),
            None => 0.0,
        };
        log::debug!("order {order}: max change {max_change:.4e}");
        steps.push(ConvergenceStep {
            order,
            profile,
            max_change,
        });
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fet_types::config::Axis;
    use fet_types::constants::REFERENCE_ZEROTH_MOMENT;

    fn window(order: usize) -> ExpansionWindow {
        ExpansionWindow {
            order,
            axis: Axis::Z,
            minimum: -10.0,
            maximum: 10.0,
        }
    }

    /// Symmetric, absorber-dipped moments shaped like the slab result.
    fn slab_moments() -> Vec<f64> {
        vec![
            REFERENCE_ZEROTH_MOMENT,
            0.012,
            -6.91,
            -0.004,
            -1.37,
            0.002,
            0.88,
            -0.001,
            -0.41,
        ]
    }

    #[test]
    fn test_scale_moments() {
        let a = scale_moments(&[2.0, 2.0, 2.0, 2.0]);
        assert_eq!(a, vec![1.0, 3.0, 5.0, 7.0]);
        assert!(scale_moments(&[]).is_empty());
    }

    #[test]
    fn test_reconstruct_coefficients_and_domain() {
        let s = reconstruct(&slab_moments(), &window(8)).unwrap();
        assert_eq!(s.order(), 8);
        assert_eq!(s.domain(), (-10.0, 10.0));
        assert_relative_eq!(s.coefficients()[0], 0.5 * REFERENCE_ZEROTH_MOMENT / 10.0);
        assert_relative_eq!(s.coefficients()[2], 2.5 * -6.91 / 10.0);
    }

    #[test]
    fn test_reconstruct_needs_all_orders() {
        let err = reconstruct(&[1.0, 2.0], &window(4)).unwrap_err();
        assert!(matches!(err, FetError::MissingMoments(_)));
        let s = reconstruct(&[1.0, 2.0, 3.0, 4.0], &window(1)).unwrap();
        assert_eq!(s.order(), 1);
    }

    #[test]
    fn test_integral_matches_zeroth_moment() {
        let m = slab_moments();
        let s = reconstruct(&m, &window(8)).unwrap();
        let check = check_integral(&s, &m, 1e-6).unwrap();
        assert!(check.passed, "{check:?}");
        assert_relative_eq!(check.integral, 36.4348, max_relative = 1e-6);
        assert_relative_eq!(check.exact, 36.4348, max_relative = 1e-12);
    }

    #[test]
    fn test_integral_check_fails_on_wrong_reference() {
        let m = slab_moments();
        let s = reconstruct(&m, &window(8)).unwrap();
        let mut shifted = m.clone();
        shifted[0] *= 1.1;
        let check = check_integral(&s, &shifted, 1e-3).unwrap();
        assert!(!check.passed);
        assert!(check.relative_difference > 0.05);
        assert!(check_integral(&s, &[], 1e-3).is_err());
    }

    #[test]
    fn test_profile_integral_on_grid() {
        let m = slab_moments();
        let s = reconstruct(&m, &window(8)).unwrap();
        let grid = AxialGrid::new(1000, -10.0, 10.0);
        let profile = evaluate_profile(&s, &grid);
        assert_eq!(profile.len(), 1000);
        let trap = profile_integral(&profile).unwrap();
        assert_relative_eq!(trap, REFERENCE_ZEROTH_MOMENT, max_relative = 1e-3);
    }

    #[test]
    fn test_flat_flux_reconstruction() {
        // φ = 2 on [-10, 10] has m_0 = 40 and no higher moments.
        let s = reconstruct(&[40.0, 0.0, 0.0], &window(2)).unwrap();
        for z in [-10.0, -3.3, 0.0, 7.1, 10.0] {
            assert_relative_eq!(s.eval(z), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_flux_reconstruction() {
        // φ(z) = 1 + z/10 on [-10, 10]: m_0 = 20, m_1 = ∫ (1 + x) x · 10 dx = 20/3.
        let s = reconstruct(&[20.0, 20.0 / 3.0], &window(1)).unwrap();
        for z in [-10.0, -5.0, 0.0, 2.5, 10.0] {
            assert_relative_eq!(s.eval(z), 1.0 + z / 10.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_endpoints_bounded() {
        let s = reconstruct(&slab_moments(), &window(8)).unwrap();
        let bound = s.sup_bound();
        for z in [-10.0, 10.0] {
            let v = s.eval(z);
            assert!(v.is_finite());
            assert!(v.abs() <= bound + 1e-12, "|φ({z})| = {} > {bound}", v.abs());
        }
    }

    #[test]
    fn test_order_convergence() {
        let grid = AxialGrid::new(201, -10.0, 10.0);
        let steps = order_convergence(&slab_moments(), &window(8), &grid).unwrap();
        assert_eq!(steps.len(), 9);
        assert_eq!(steps[0].max_change, 0.0);
        // P0 alone is the window average.
        let avg = REFERENCE_ZEROTH_MOMENT / 20.0;
        assert!(steps[0].profile.phi.iter().all(|p| (p - avg).abs() < 1e-12));
        // odd moments are tiny, so odd orders barely move the profile
        assert!(steps[1].max_change < 0.01);
        assert!(steps[2].max_change > 0.1);
        assert_eq!(steps.last().unwrap().order, 8);
    }
}
