// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — FET Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Declarative input model consumed by the external transport engine.
//!
//! Materials, CSG geometry, run settings and tallies are plain data; the
//! [`model::Model`] validates cross references and renders the four engine
//! input decks (`materials.xml`, `geometry.xml`, `settings.xml`,
//! `tallies.xml`).

pub mod geometry;
pub mod material;
pub mod model;
pub mod nuclides;
pub mod settings;
pub mod tally;
mod xml;

pub use geometry::{BoundaryType, Cell, Geometry, Region, Surface, SurfaceKind};
pub use material::{Component, Density, DensityUnits, Material};
pub use model::{ExpansionWindow, Model};
pub use settings::{RunMode, Settings, Source, SpatialDistribution};
pub use tally::{Filter, Tally};
