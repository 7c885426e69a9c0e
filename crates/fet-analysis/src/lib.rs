// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — FET Analysis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Post-processing of functional-expansion tally moments.

pub mod expansion;
pub mod plot;
pub mod report;
