// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference slab problem used by the expansion-filter tutorial.

/// Lower edge of the axial expansion window [cm].
pub const Z_MIN_CM: f64 = -10.0;

/// Upper edge of the axial expansion window [cm].
pub const Z_MAX_CM: f64 = 10.0;

/// Side length of the square reflective box [cm].
pub const BOX_WIDTH_CM: f64 = 10.0;

/// Thickness of the B4C absorber slab centred at z = 0 [cm].
pub const ABSORBER_THICKNESS_CM: f64 = 1.0;

/// U-235 enrichment of the fuel [wt%].
pub const FUEL_ENRICHMENT_PCT: f64 = 4.5;

/// UO2 fuel density [g/cm³].
pub const FUEL_DENSITY_G_CC: f64 = 10.0;

/// B4C absorber density [g/cm³].
pub const ABSORBER_DENSITY_G_CC: f64 = 2.5;

/// Legendre expansion order of the flux tally.
pub const DEFAULT_EXPANSION_ORDER: usize = 8;

/// Total batches.
pub const DEFAULT_BATCHES: u32 = 210;

/// Inactive (source convergence) batches.
pub const DEFAULT_INACTIVE: u32 = 10;

/// Particles per batch.
pub const DEFAULT_PARTICLES: u64 = 1000;

/// Evaluation points of the reconstructed profile.
pub const DEFAULT_PROFILE_POINTS: usize = 1000;

/// Relative tolerance of the integral-vs-zeroth-moment check.
pub const DEFAULT_INTEGRAL_TOLERANCE: f64 = 1e-3;

/// Zeroth flux moment reported by the reference run.
pub const REFERENCE_ZEROTH_MOMENT: f64 = 36.4348;
