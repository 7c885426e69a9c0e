// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Tallies
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tally specifications and functional-expansion filters.
//!
//! A spatial Legendre filter weights every score by P_n(x) with
//!   x = (2u − (min + max)) / (max − min)
//! along one axis `u`, giving one bin per order n = 0..=N.

use crate::xml::{fmt_f64, Element};
use fet_types::config::Axis;
use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    SpatialLegendre {
        id: u32,
        order: usize,
        axis: Axis,
        minimum: f64,
        maximum: f64,
    },
}

impl Filter {
    pub fn spatial_legendre(id: u32, order: usize, axis: Axis, minimum: f64, maximum: f64) -> Self {
        Filter::SpatialLegendre {
            id,
            order,
            axis,
            minimum,
            maximum,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Filter::SpatialLegendre { id, .. } => *id,
        }
    }

    /// Number of bins (N + 1 for order N).
    pub fn num_bins(&self) -> usize {
        match self {
            Filter::SpatialLegendre { order, .. } => order + 1,
        }
    }

    pub fn validate(&self) -> FetResult<()> {
        match *self {
            Filter::SpatialLegendre {
                id,
                minimum,
                maximum,
                ..
            } => {
                if !(minimum.is_finite() && maximum.is_finite()) || minimum >= maximum {
                    return Err(FetError::InvalidModel(format!(
                        "spatial Legendre filter {id}: minimum must be < maximum, got [{minimum}, {maximum}]"
                    )));
                }
                Ok(())
            }
        }
    }

    pub(crate) fn to_xml(&self) -> Element {
        match self {
            Filter::SpatialLegendre {
                id,
                order,
                axis,
                minimum,
                maximum,
            } => Element::new("filter")
                .attr("id", id)
                .attr("type", "spatiallegendre")
                .child(Element::leaf("order", order))
                .child(Element::leaf("axis", axis.as_str()))
                .child(Element::leaf("min", fmt_f64(*minimum)))
                .child(Element::leaf("max", fmt_f64(*maximum))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub id: u32,
    pub name: String,
    pub scores: Vec<String>,
    /// Empty means the material total.
    pub nuclides: Vec<String>,
    pub filters: Vec<Filter>,
}

impl Tally {
    pub fn new(id: u32, name: &str) -> Self {
        Tally {
            id,
            name: name.to_string(),
            scores: Vec::new(),
            nuclides: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: &str) -> Self {
        self.scores.push(score.to_string());
        self
    }

    pub fn with_nuclide(mut self, nuclide: &str) -> Self {
        self.nuclides.push(nuclide.to_string());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// The spatial Legendre filter, if the tally carries one.
    pub fn spatial_legendre(&self) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|f| matches!(f, Filter::SpatialLegendre { .. }))
    }

    pub fn validate(&self) -> FetResult<()> {
        if self.scores.is_empty() {
            return Err(FetError::InvalidModel(format!(
                "tally {} ('{}') has no scores",
                self.id, self.name
            )));
        }
        if let Some(empty) = self.scores.iter().find(|s| s.trim().is_empty()) {
            return Err(FetError::InvalidModel(format!(
                "tally {} has a blank score {empty:?}",
                self.id
            )));
        }
        for f in &self.filters {
            f.validate()?;
        }
        Ok(())
    }

    pub(crate) fn to_xml(&self) -> Element {
        let mut el = Element::new("tally")
            .attr("id", self.id)
            .attr("name", &self.name);
        if !self.filters.is_empty() {
            let ids: Vec<String> = self.filters.iter().map(|f| f.id().to_string()).collect();
            el.push(Element::leaf("filters", ids.join(" ")));
        }
        if !self.nuclides.is_empty() {
            el.push(Element::leaf("nuclides", self.nuclides.join(" ")));
        }
        el.push(Element::leaf("scores", self.scores.join(" ")));
        el
    }
}
