// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — FET Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Boundary to the external Monte Carlo transport engine.
//!
//! `runner` spawns the engine on an exported model directory; `results`
//! turns its tally output into a table of per-moment mean / std-dev rows.

pub mod results;
pub mod runner;
