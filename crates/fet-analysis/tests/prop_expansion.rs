// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Expansion Property Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for moment reconstruction.

use fet_analysis::expansion::{check_integral, evaluate_profile, reconstruct, scale_moments};
use fet_model::ExpansionWindow;
use fet_types::config::Axis;
use fet_types::state::AxialGrid;
use proptest::prelude::*;

fn window_strategy() -> impl Strategy<Value = ExpansionWindow> {
    (0usize..10, -50.0f64..50.0, 0.5f64..40.0).prop_map(|(order, lo, width)| ExpansionWindow {
        order,
        axis: Axis::Z,
        minimum: lo,
        maximum: lo + width,
    })
}

fn case_strategy() -> impl Strategy<Value = (ExpansionWindow, Vec<f64>)> {
    window_strategy().prop_flat_map(|w| {
        let m0 = 1.0f64..100.0;
        let rest = prop::collection::vec(-20.0f64..20.0, w.order);
        (Just(w), m0, rest).prop_map(|(w, m0, rest)| {
            let mut m = vec![m0];
            m.extend(rest);
            (w, m)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn integral_recovers_zeroth_moment((window, moments) in case_strategy()) {
        let series = reconstruct(&moments, &window).unwrap();
        let check = check_integral(&series, &moments, 1e-4).unwrap();
        prop_assert!(check.passed, "{:?}", check);
        prop_assert!((check.exact - moments[0]).abs() <= 1e-9 * moments[0]);
    }

    #[test]
    fn endpoints_bounded_and_continuous((window, moments) in case_strategy()) {
        let series = reconstruct(&moments, &window).unwrap();
        let bound = series.sup_bound();
        let eps = 1e-7 * (window.maximum - window.minimum);
        for z in [window.minimum, window.maximum] {
            let v = series.eval(z);
            prop_assert!(v.is_finite());
            prop_assert!(v.abs() <= bound * (1.0 + 1e-12) + 1e-12);
        }
        let inside_lo = series.eval(window.minimum + eps);
        let inside_hi = series.eval(window.maximum - eps);
        let jump_tol = 1e-3 * bound.max(1.0);
        prop_assert!((inside_lo - series.eval(window.minimum)).abs() < jump_tol);
        prop_assert!((inside_hi - series.eval(window.maximum)).abs() < jump_tol);
    }

    #[test]
    fn scaling_is_linear(
        m in prop::collection::vec(-10.0f64..10.0, 1..12),
        k in -5.0f64..5.0,
    ) {
        let scaled: Vec<f64> = m.iter().map(|x| k * x).collect();
        let lhs = scale_moments(&scaled);
        let rhs = scale_moments(&m);
        for (a, b) in lhs.iter().zip(rhs.iter()) {
            prop_assert!((a - k * b).abs() <= 1e-12 * (1.0 + b.abs() * k.abs()));
        }
    }

    #[test]
    fn profile_matches_grid((window, moments) in case_strategy(), n in 2usize..300) {
        let series = reconstruct(&moments, &window).unwrap();
        let grid = AxialGrid::new(n, window.minimum, window.maximum);
        let profile = evaluate_profile(&series, &grid);
        prop_assert_eq!(profile.len(), n);
        prop_assert!((profile.z[0] - window.minimum).abs() < 1e-12);
        prop_assert!(profile.phi.iter().all(|p| p.is_finite()));
    }
}
