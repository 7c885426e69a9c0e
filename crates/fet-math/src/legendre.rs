// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Legendre Series
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Truncated Legendre series on an arbitrary window `[a, b]`.
//!
//! A series `f(z) = Σ c_n P_n(x(z))` with the affine window map
//!   x(z) = (2z − (a + b)) / (b − a)
//! so that `[a, b]` lands on the orthogonality interval `[-1, 1]`.
//! Evaluation uses the Clenshaw recurrence built on Bonnet's relation
//!   (k + 1) P_{k+1} = (2k + 1) x P_k − k P_{k−1}.

use fet_types::error::{FetError, FetResult};
use ndarray::Array1;

/// Legendre polynomial P_n(x) by upward Bonnet recurrence.
pub fn legendre_p(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let mut p_prev = 1.0;
            let mut p = x;
            for k in 1..n {
                let kf = k as f64;
                let p_next = ((2.0 * kf + 1.0) * x * p - kf * p_prev) / (kf + 1.0);
                p_prev = p;
                p = p_next;
            }
            p
        }
    }
}

/// All of P_0(x) .. P_order(x).
pub fn legendre_all(order: usize, x: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(order + 1);
    out.push(1.0);
    if order == 0 {
        return out;
    }
    out.push(x);
    for k in 1..order {
        let kf = k as f64;
        let next = ((2.0 * kf + 1.0) * x * out[k] - kf * out[k - 1]) / (kf + 1.0);
        out.push(next);
    }
    out
}

/// Truncated Legendre series with a physical domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendreSeries {
    coefficients: Vec<f64>,
    domain: (f64, f64),
}

impl LegendreSeries {
    /// Build from coefficients `c_0..c_N` and domain `(a, b)` with `a < b`.
    pub fn new(coefficients: Vec<f64>, domain: (f64, f64)) -> FetResult<Self> {
        if coefficients.is_empty() {
            return Err(FetError::Numerical(
                "Legendre series needs at least one coefficient".to_string(),
            ));
        }
        if let Some((n, c)) = coefficients.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(FetError::Numerical(format!(
                "Legendre coefficient c_{n} is not finite: {c}"
            )));
        }
        let (a, b) = domain;
        if !(a.is_finite() && b.is_finite()) || a >= b {
            return Err(FetError::Numerical(format!(
                "Legendre domain must satisfy a < b, got ({a}, {b})"
            )));
        }
        Ok(LegendreSeries {
            coefficients,
            domain,
        })
    }

    /// Series on the canonical window `[-1, 1]`.
    pub fn canonical(coefficients: Vec<f64>) -> FetResult<Self> {
        Self::new(coefficients, (-1.0, 1.0))
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Highest polynomial order N.
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Affine map of the domain onto `[-1, 1]`.
    pub fn map_to_window(&self, z: f64) -> f64 {
        let (a, b) = self.domain;
        (2.0 * z - (a + b)) / (b - a)
    }

    /// Evaluate at physical coordinate `z`.
    ///
    /// Points outside the domain are extrapolated, not clamped.
    pub fn eval(&self, z: f64) -> f64 {
        clenshaw(&self.coefficients, self.map_to_window(z))
    }

    pub fn eval_many(&self, z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|zi| self.eval(zi))
    }

    /// Series restricted to orders `0..=order`. Orders above N are ignored.
    pub fn truncate(&self, order: usize) -> Self {
        let keep = (order + 1).min(self.coefficients.len());
        LegendreSeries {
            coefficients: self.coefficients[..keep].to_vec(),
            domain: self.domain,
        }
    }

    /// Exact integral over the domain. Only P_0 survives:
    /// ∫_a^b f dz = (b − a)/2 · ∫_{-1}^{1} f dx = (b − a) · c_0.
    pub fn integral(&self) -> f64 {
        let (a, b) = self.domain;
        (b - a) * self.coefficients[0]
    }

    /// Upper bound of |f| on the domain, Σ|c_n|, since |P_n| ≤ 1 on [-1, 1].
    pub fn sup_bound(&self) -> f64 {
        self.coefficients.iter().map(|c| c.abs()).sum()
    }
}

fn clenshaw(c: &[f64], x: f64) -> f64 {
    let n = c.len();
    if n == 1 {
        return c[0];
    }
    // b1 = b_{k+1}, b2 = b_{k+2}
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for k in (1..n).rev() {
        let kf = k as f64;
        let alpha = (2.0 * kf + 1.0) * x / (kf + 1.0);
        let beta = -(kf + 1.0) / (kf + 2.0);
        let bk = c[k] + alpha * b1 + beta * b2;
        b2 = b1;
        b1 = bk;
    }
    c[0] + x * b1 - 0.5 * b2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_order_closed_forms() {
        for &x in &[-1.0, -0.3, 0.0, 0.45, 1.0] {
            assert!((legendre_p(2, x) - 0.5 * (3.0 * x * x - 1.0)).abs() < 1e-14);
            assert!((legendre_p(3, x) - 0.5 * (5.0 * x * x * x - 3.0 * x)).abs() < 1e-14);
            let p4 = (35.0 * x.powi(4) - 30.0 * x * x + 3.0) / 8.0;
            assert!((legendre_p(4, x) - p4).abs() < 1e-14);
        }
    }

    #[test]
    fn test_endpoint_values() {
        for n in 0..20 {
            assert!((legendre_p(n, 1.0) - 1.0).abs() < 1e-12);
            let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
            assert!((legendre_p(n, -1.0) - sign).abs() < 1e-12);
        }
    }

    #[test]
    fn test_legendre_all_matches_single() {
        let all = legendre_all(10, 0.37);
        assert_eq!(all.len(), 11);
        for (n, v) in all.iter().enumerate() {
            assert!((v - legendre_p(n, 0.37)).abs() < 1e-14);
        }
        assert_eq!(legendre_all(0, 0.5), vec![1.0]);
    }

    #[test]
    fn test_clenshaw_matches_direct_sum() {
        let c = vec![0.8, -0.2, 0.5, 0.1, -0.05, 0.3];
        let series = LegendreSeries::canonical(c.clone()).unwrap();
        for i in 0..=20 {
            let x = -1.0 + 0.1 * i as f64;
            let direct: f64 = c
                .iter()
                .enumerate()
                .map(|(n, cn)| cn * legendre_p(n, x))
                .sum();
            assert!((series.eval(x) - direct).abs() < 1e-13, "x={x}");
        }
    }

    #[test]
    fn test_window_mapping() {
        let s = LegendreSeries::new(vec![1.0, 1.0], (-10.0, 10.0)).unwrap();
        assert!((s.map_to_window(-10.0) + 1.0).abs() < 1e-15);
        assert!((s.map_to_window(10.0) - 1.0).abs() < 1e-15);
        assert!(s.map_to_window(0.0).abs() < 1e-15);
        // f(z) = 1 + z/10
        assert!((s.eval(5.0) - 1.5).abs() < 1e-14);

        let shifted = LegendreSeries::new(vec![0.0, 1.0], (2.0, 6.0)).unwrap();
        assert!((shifted.eval(4.0)).abs() < 1e-15);
        assert!((shifted.eval(6.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_integral_only_sees_p0() {
        let s = LegendreSeries::new(vec![2.0, 5.0, -3.0, 7.0], (-10.0, 10.0)).unwrap();
        assert!((s.integral() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncate() {
        let s = LegendreSeries::canonical(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.truncate(1).coefficients(), &[1.0, 2.0]);
        assert_eq!(s.truncate(0).order(), 0);
        assert_eq!(s.truncate(99).order(), 3);
    }

    #[test]
    fn test_sup_bound_holds_at_endpoints() {
        let s = LegendreSeries::new(vec![1.0, -0.4, 0.25, -0.1], (0.0, 3.0)).unwrap();
        let bound = s.sup_bound();
        assert!(s.eval(0.0).abs() <= bound + 1e-12);
        assert!(s.eval(3.0).abs() <= bound + 1e-12);
        // At x = 1 every P_n is 1, so the bound is attained up to sign mix.
        assert!((s.eval(3.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(LegendreSeries::canonical(vec![]).is_err());
        assert!(LegendreSeries::canonical(vec![1.0, f64::NAN]).is_err());
        assert!(LegendreSeries::new(vec![1.0], (1.0, 1.0)).is_err());
        assert!(LegendreSeries::new(vec![1.0], (2.0, -2.0)).is_err());
    }

    #[test]
    fn test_eval_many() {
        let s = LegendreSeries::new(vec![0.5, 0.5], (-1.0, 1.0)).unwrap();
        let z = Array1::linspace(-1.0, 1.0, 3);
        let v = s.eval_many(&z);
        assert!((v[0] - 0.0).abs() < 1e-15);
        assert!((v[1] - 0.5).abs() < 1e-15);
        assert!((v[2] - 1.0).abs() < 1e-15);
    }
}
