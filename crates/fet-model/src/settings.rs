// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Run Settings
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Batch/particle settings and the starting source distribution.

use crate::geometry::BoundingBox;
use crate::xml::{fmt_f64, Element};
use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Eigenvalue,
    FixedSource,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Eigenvalue => "eigenvalue",
            RunMode::FixedSource => "fixed source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpatialDistribution {
    /// Uniform in a box. With `only_fissionable`, sites outside fissionable
    /// material are rejected by the engine.
    Box {
        lower_left: [f64; 3],
        upper_right: [f64; 3],
        only_fissionable: bool,
    },
    Point {
        xyz: [f64; 3],
    },
}

impl SpatialDistribution {
    /// Uniform box over a finite bounding box.
    pub fn from_bounding_box(bb: &BoundingBox, only_fissionable: bool) -> FetResult<Self> {
        if !bb.is_finite() {
            return Err(FetError::InvalidModel(format!(
                "source box needs a finite bounding box, got {:?} .. {:?}",
                bb.lower_left, bb.upper_right
            )));
        }
        Ok(SpatialDistribution::Box {
            lower_left: bb.lower_left,
            upper_right: bb.upper_right,
            only_fissionable,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub space: SpatialDistribution,
    pub strength: f64,
}

impl Source {
    pub fn new(space: SpatialDistribution) -> Self {
        Source {
            space,
            strength: 1.0,
        }
    }

    fn to_xml(&self) -> Element {
        let space = match self.space {
            SpatialDistribution::Box {
                lower_left,
                upper_right,
                ..
            } => {
                let params: Vec<String> = lower_left
                    .iter()
                    .chain(upper_right.iter())
                    .map(|v| fmt_f64(*v))
                    .collect();
                Element::new("space")
                    .attr("type", "box")
                    .child(Element::leaf("parameters", params.join(" ")))
            }
            SpatialDistribution::Point { xyz } => {
                let params: Vec<String> = xyz.iter().map(|v| fmt_f64(*v)).collect();
                Element::new("space")
                    .attr("type", "point")
                    .child(Element::leaf("parameters", params.join(" ")))
            }
        };
        let mut el = Element::new("source")
            .attr("particle", "neutron")
            .attr("strength", fmt_f64(self.strength))
            .attr("type", "independent")
            .child(space);
        if let SpatialDistribution::Box {
            only_fissionable: true,
            ..
        } = self.space
        {
            el.push(Element::new("constraints").child(Element::leaf("fissionable", "true")));
        }
        el
    }
}

/// Final statepoint the engine writes after `batches` batches.
pub fn statepoint_name(batches: u32) -> String {
    format!("statepoint.{batches}.h5")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub run_mode: RunMode,
    pub batches: u32,
    pub inactive: u32,
    pub particles: u64,
    pub source: Option<Source>,
    pub seed: Option<u64>,
    /// Ask the engine for the text tally report (`tallies.out`).
    pub output_tallies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            run_mode: RunMode::Eigenvalue,
            batches: 0,
            inactive: 0,
            particles: 0,
            source: None,
            seed: None,
            output_tallies: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> FetResult<()> {
        if self.particles == 0 {
            return Err(FetError::InvalidModel("particles must be > 0".to_string()));
        }
        if self.batches == 0 {
            return Err(FetError::InvalidModel("batches must be > 0".to_string()));
        }
        if self.run_mode == RunMode::Eigenvalue && self.batches <= self.inactive {
            return Err(FetError::InvalidModel(format!(
                "eigenvalue run needs batches ({}) > inactive ({})",
                self.batches, self.inactive
            )));
        }
        match &self.source {
            None if self.run_mode == RunMode::FixedSource => Err(FetError::InvalidModel(
                "fixed-source run needs an explicit source".to_string(),
            )),
            Some(Source {
                space:
                    SpatialDistribution::Box {
                        lower_left,
                        upper_right,
                        ..
                    },
                ..
            }) if lower_left
                .iter()
                .zip(upper_right.iter())
                .any(|(lo, hi)| !(lo.is_finite() && hi.is_finite()) || lo >= hi) =>
            {
                Err(FetError::InvalidModel(format!(
                    "source box is degenerate: {lower_left:?} .. {upper_right:?}"
                )))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn to_xml(&self) -> Element {
        let mut root = Element::new("settings")
            .child(Element::leaf("run_mode", self.run_mode.as_str()))
            .child(Element::leaf("particles", self.particles))
            .child(Element::leaf("batches", self.batches));
        if self.run_mode == RunMode::Eigenvalue {
            root.push(Element::leaf("inactive", self.inactive));
        }
        if let Some(source) = &self.source {
            root.push(source.to_xml());
        }
        if let Some(seed) = self.seed {
            root.push(Element::leaf("seed", seed));
        }
        root.push(Element::new("output").child(Element::leaf("tallies", self.output_tallies)));
        root
    }
}
