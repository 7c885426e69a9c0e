// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Material compositions.

use crate::nuclides::expand_element;
use crate::xml::{fmt_f64, Element};
use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DensityUnits {
    /// g/cm³
    GramsPerCc,
    /// atom/b-cm
    AtomPerBarnCm,
    /// Sum of the component densities (components given in atom/b-cm).
    Sum,
}

impl DensityUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            DensityUnits::GramsPerCc => "g/cm3",
            DensityUnits::AtomPerBarnCm => "atom/b-cm",
            DensityUnits::Sum => "sum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub units: DensityUnits,
    pub value: f64,
}

/// One constituent, in atom fractions (relative, not normalized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Nuclide {
        name: String,
        fraction: f64,
    },
    Element {
        name: String,
        fraction: f64,
        /// U-235 weight percent, uranium only.
        enrichment: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: u32,
    pub name: String,
    pub density: Option<Density>,
    pub components: Vec<Component>,
    /// Thermal scattering tables, e.g. `c_H_in_H2O`.
    pub s_alpha_beta: Vec<String>,
}

impl Material {
    pub fn new(id: u32, name: &str) -> Self {
        Material {
            id,
            name: name.to_string(),
            density: None,
            components: Vec::new(),
            s_alpha_beta: Vec::new(),
        }
    }

    pub fn add_nuclide(&mut self, name: &str, fraction: f64) -> &mut Self {
        self.components.push(Component::Nuclide {
            name: name.to_string(),
            fraction,
        });
        self
    }

    pub fn add_element(&mut self, name: &str, fraction: f64) -> &mut Self {
        self.components.push(Component::Element {
            name: name.to_string(),
            fraction,
            enrichment: None,
        });
        self
    }

    pub fn add_element_enriched(&mut self, name: &str, fraction: f64, enrichment: f64) -> &mut Self {
        self.components.push(Component::Element {
            name: name.to_string(),
            fraction,
            enrichment: Some(enrichment),
        });
        self
    }

    pub fn set_density(&mut self, units: DensityUnits, value: f64) -> &mut Self {
        self.density = Some(Density { units, value });
        self
    }

    pub fn add_s_alpha_beta(&mut self, table: &str) -> &mut Self {
        self.s_alpha_beta.push(table.to_string());
        self
    }

    /// Contains uranium or plutonium, i.e. a valid fission-source site.
    pub fn is_fissionable(&self) -> bool {
        self.components.iter().any(|c| match c {
            Component::Nuclide { name, .. } => name.starts_with('U') || name.starts_with("Pu"),
            Component::Element { name, .. } => name == "U" || name == "Pu",
        })
    }

    pub fn validate(&self) -> FetResult<()> {
        if self.components.is_empty() {
            return Err(FetError::InvalidModel(format!(
                "material {} ('{}') has no components",
                self.id, self.name
            )));
        }
        match self.density {
            None => {
                return Err(FetError::InvalidModel(format!(
                    "material {} ('{}') has no density",
                    self.id, self.name
                )))
            }
            Some(d) if d.units != DensityUnits::Sum && !(d.value.is_finite() && d.value > 0.0) => {
                return Err(FetError::InvalidModel(format!(
                    "material {} density must be > 0, got {}",
                    self.id, d.value
                )))
            }
            _ => {}
        }
        for c in &self.components {
            let (name, fraction) = match c {
                Component::Nuclide { name, fraction } => (name, *fraction),
                Component::Element { name, fraction, .. } => (name, *fraction),
            };
            if !(fraction.is_finite() && fraction > 0.0) {
                return Err(FetError::InvalidModel(format!(
                    "material {}: fraction of {name} must be > 0, got {fraction}",
                    self.id
                )));
            }
        }
        self.nuclide_fractions().map(|_| ())
    }

    /// Components flattened to nuclides, elements expanded, same nuclides merged.
    pub fn nuclide_fractions(&self) -> FetResult<Vec<(String, f64)>> {
        let mut out: Vec<(String, f64)> = Vec::new();
        let mut add = |name: String, fraction: f64| {
            match out.iter_mut().find(|(n, _)| *n == name) {
                Some((_, f)) => *f += fraction,
                None => out.push((name, fraction)),
            }
        };
        for c in &self.components {
            match c {
                Component::Nuclide { name, fraction } => add(name.clone(), *fraction),
                Component::Element {
                    name,
                    fraction,
                    enrichment,
                } => {
                    for (nuclide, abundance) in expand_element(name, *enrichment)? {
                        add(nuclide, fraction * abundance);
                    }
                }
            }
        }
        Ok(out)
    }

    pub(crate) fn to_xml(&self) -> FetResult<Element> {
        let density = self.density.ok_or_else(|| {
            FetError::InvalidModel(format!("material {} has no density", self.id))
        })?;
        let mut el = Element::new("material")
            .attr("id", self.id)
            .attr("name", &self.name)
            .child(
                Element::new("density")
                    .attr("units", density.units.as_str())
                    .attr("value", fmt_f64(density.value)),
            );
        for (nuclide, fraction) in self.nuclide_fractions()? {
            el.push(
                Element::new("nuclide")
                    .attr("ao", fmt_f64(fraction))
                    .attr("name", nuclide),
            );
        }
        for table in &self.s_alpha_beta {
            el.push(Element::new("sab").attr("name", table));
        }
        Ok(el)
    }
}
