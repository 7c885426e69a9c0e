// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Tally Result Property Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the tally report reader.

use fet_engine::results::{parse_tally_output, read_csv, write_csv};
use proptest::prelude::*;

fn render_report(tally_id: u32, means: &[f64], stds: &[f64]) -> String {
    let mut out = format!(
        " ============================>     TALLY {tally_id}     <============================\n\n"
    );
    for (n, (m, s)) in means.iter().zip(stds.iter()).enumerate() {
        out.push_str(&format!(" Legendre expansion, z axis, P{n}\n"));
        out.push_str("   Total Material\n");
        out.push_str(&format!("     Flux                 {m:.6e}       +/- {s:.6e}\n"));
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn report_moments_recovered(
        tally_id in 1u32..50,
        means in prop::collection::vec(-100.0f64..100.0, 1..12),
    ) {
        let stds: Vec<f64> = means.iter().map(|m| 0.01 * m.abs() + 1e-3).collect();
        let text = render_report(tally_id, &means, &stds);
        let table = parse_tally_output(&text, tally_id).unwrap();
        let parsed = table.moments("flux", "total").unwrap();
        prop_assert_eq!(parsed.len(), means.len());
        for (p, m) in parsed.iter().zip(means.iter()) {
            prop_assert!((p - m).abs() <= 1e-6 * m.abs().max(1.0));
        }
        let errs = table.relative_errors("flux", "total").unwrap();
        prop_assert!(errs.iter().all(|e| *e >= 0.0));
    }

    #[test]
    fn other_tallies_are_skipped(
        means in prop::collection::vec(-10.0f64..10.0, 1..6),
    ) {
        let stds = vec![0.1; means.len()];
        let mut text = render_report(3, &[99.0, 98.0], &[1.0, 1.0]);
        text.push_str(&render_report(4, &means, &stds));
        let table = parse_tally_output(&text, 4).unwrap();
        prop_assert_eq!(table.len(), means.len());
        prop_assert!(parse_tally_output(&text, 5).is_err());
    }

    #[test]
    fn csv_preserves_table(
        means in prop::collection::vec(-1.0e3f64..1.0e3, 1..10),
    ) {
        let stds: Vec<f64> = means.iter().map(|m| m.abs() * 0.05).collect();
        let table = parse_tally_output(&render_report(1, &means, &stds), 1).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_csv(&path, &table).unwrap();
        let back = read_csv(&path, 1).unwrap();
        prop_assert_eq!(back, table);
    }
}
