// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1D numerical integration.
//!
//! Trapezoid rules for sampled data and composite / adaptive Simpson for
//! callables. Used by the integral-vs-zeroth-moment check.

use fet_types::error::{FetError, FetResult};

/// Uniformly spaced trapezoid rule. Returns 0 for fewer than 2 samples.
pub fn trapezoid(y: &[f64], dx: f64) -> f64 {
    if y.len() < 2 {
        return 0.0;
    }
    let interior: f64 = y[1..y.len() - 1].iter().sum();
    dx * (0.5 * (y[0] + y[y.len() - 1]) + interior)
}

/// Trapezoid rule on (possibly non-uniform) abscissae.
pub fn trapezoid_xy(x: &[f64], y: &[f64]) -> FetResult<f64> {
    if x.len() != y.len() {
        return Err(FetError::Numerical(format!(
            "trapezoid: x has {} samples, y has {}",
            x.len(),
            y.len()
        )));
    }
    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum())
}

/// Composite Simpson rule with `n` intervals (rounded up to even, min 2).
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = n.max(2);
    let n = if n % 2 == 1 { n + 1 } else { n };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

/// Adaptive Simpson with Richardson correction.
pub fn adaptive_simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tol: f64, max_depth: usize) -> f64 {
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = (b - a) / 6.0 * (fa + 4.0 * fm + fb);
    adaptive_step(&f, a, b, fa, fm, fb, whole, tol.abs().max(f64::EPSILON), max_depth)
}

#[allow(clippy::too_many_arguments)]
fn adaptive_step<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tol: f64,
    depth: usize,
) -> f64 {
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = (m - a) / 6.0 * (fa + 4.0 * flm + fm);
    let right = (b - m) / 6.0 * (fm + 4.0 * frm + fb);
    let delta = left + right - whole;

    if depth == 0 || delta.abs() <= 15.0 * tol {
        return left + right + delta / 15.0;
    }
    adaptive_step(f, a, m, fa, flm, fm, left, 0.5 * tol, depth - 1)
        + adaptive_step(f, m, b, fm, frm, fb, right, 0.5 * tol, depth - 1)
}
