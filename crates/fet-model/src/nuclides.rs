// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Nuclide Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Natural isotopic abundances and element expansion.
//!
//! The engine input deck lists nuclides only, so elements are expanded into
//! their naturally occurring isotopes (IUPAC atom fractions). Enriched
//! uranium follows the usual weight-fraction correlation
//!   w(U234) = 0.0089 e, w(U235) = e, w(U236) = 0.0046 e,
//!   w(U238) = 100 − 1.0135 e
//! converted to atom fractions with the isotope masses.

use fet_types::error::{FetError, FetResult};

/// (nuclide, atom fraction) of the natural element.
const NATURAL: &[(&str, &[(&str, f64)])] = &[
    ("H", &[("H1", 0.999885), ("H2", 0.000115)]),
    ("B", &[("B10", 0.199), ("B11", 0.801)]),
    ("C", &[("C12", 0.9893), ("C13", 0.0107)]),
    ("N", &[("N14", 0.99636), ("N15", 0.00364)]),
    ("O", &[("O16", 0.99757), ("O17", 0.00038), ("O18", 0.00205)]),
    (
        "Zr",
        &[
            ("Zr90", 0.5145),
            ("Zr91", 0.1122),
            ("Zr92", 0.1715),
            ("Zr94", 0.1738),
            ("Zr96", 0.0280),
        ],
    ),
    (
        "U",
        &[("U234", 0.000054), ("U235", 0.007204), ("U238", 0.992742)],
    ),
];

/// Isotope masses [u] used for enrichment conversion.
const MASS_U234: f64 = 234.040_952_1;
const MASS_U235: f64 = 235.043_929_9;
const MASS_U236: f64 = 236.045_568;
const MASS_U238: f64 = 238.050_788_2;

/// Natural abundances of an element, or `None` if not tabulated.
pub fn natural_abundances(element: &str) -> Option<&'static [(&'static str, f64)]> {
    NATURAL
        .iter()
        .find(|(symbol, _)| *symbol == element)
        .map(|(_, isotopes)| *isotopes)
}

/// Expand `element` into (nuclide, atom fraction) pairs summing to 1.
///
/// `enrichment` is the U-235 weight percent and is only valid for uranium.
pub fn expand_element(element: &str, enrichment: Option<f64>) -> FetResult<Vec<(String, f64)>> {
    match enrichment {
        Some(e) if element == "U" => enriched_uranium(e),
        Some(_) => Err(FetError::InvalidModel(format!(
            "enrichment is only supported for U, not {element}"
        ))),
        None => natural_abundances(element)
            .map(|iso| iso.iter().map(|(n, f)| (n.to_string(), *f)).collect())
            .ok_or_else(|| {
                FetError::InvalidModel(format!("no natural abundance data for element {element}"))
            }),
    }
}

fn enriched_uranium(enrichment: f64) -> FetResult<Vec<(String, f64)>> {
    // U238 weight share must stay non-negative: 100 - 1.0135 e >= 0
    if !enrichment.is_finite() || enrichment <= 0.0 || enrichment > 100.0 / 1.0135 {
        return Err(FetError::InvalidModel(format!(
            "U enrichment must lie in (0, {:.2}] wt%, got {enrichment}",
            100.0 / 1.0135
        )));
    }
    let weights = [
        ("U234", 0.0089 * enrichment, MASS_U234),
        ("U235", enrichment, MASS_U235),
        ("U236", 0.0046 * enrichment, MASS_U236),
        ("U238", 100.0 - 1.0135 * enrichment, MASS_U238),
    ];
    let moles: Vec<(&str, f64)> = weights.iter().map(|(n, w, m)| (*n, w / m)).collect();
    let total: f64 = moles.iter().map(|(_, x)| x).sum();
    Ok(moles
        .into_iter()
        .filter(|(_, x)| *x > 0.0)
        .map(|(n, x)| (n.to_string(), x / total))
        .collect())
}
