// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Complete engine input model and the reference slab problem.

use crate::geometry::{rectangular_prism, BoundaryType, Cell, Geometry, Surface};
use crate::material::{DensityUnits, Material};
use crate::settings::{RunMode, Settings, Source, SpatialDistribution};
use crate::tally::{Filter, Tally};
use crate::xml::Element;
use fet_types::config::{Axis, TutorialConfig};
use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Engine input deck file names.
pub const MATERIALS_XML: &str = "materials.xml";
pub const GEOMETRY_XML: &str = "geometry.xml";
pub const SETTINGS_XML: &str = "settings.xml";
pub const TALLIES_XML: &str = "tallies.xml";

/// Id of the expansion tally in the reference problem.
pub const TUTORIAL_TALLY_ID: u32 = 1;

/// Expansion window of a tally: order, axis and [min, max].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpansionWindow {
    pub order: usize,
    pub axis: Axis,
    pub minimum: f64,
    pub maximum: f64,
}

impl ExpansionWindow {
    pub fn half_width(&self) -> f64 {
        0.5 * (self.maximum - self.minimum)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub materials: Vec<Material>,
    pub geometry: Geometry,
    pub settings: Settings,
    pub tallies: Vec<Tally>,
}

impl Model {
    /// Cross-check ids and references across all sections.
    pub fn validate(&self) -> FetResult<()> {
        let mut material_ids = HashSet::new();
        for m in &self.materials {
            m.validate()?;
            if !material_ids.insert(m.id) {
                return Err(FetError::InvalidModel(format!("duplicate material id {}", m.id)));
            }
        }

        self.geometry.validate()?;
        for c in &self.geometry.cells {
            if let Some(fill) = c.fill {
                if !material_ids.contains(&fill) {
                    return Err(FetError::InvalidModel(format!(
                        "cell {} is filled with unknown material {fill}",
                        c.id
                    )));
                }
            }
        }

        self.settings.validate()?;
        if let Some(Source {
            space: SpatialDistribution::Box {
                only_fissionable: true,
                ..
            },
            ..
        }) = self.settings.source
        {
            if !self.materials.iter().any(Material::is_fissionable) {
                return Err(FetError::InvalidModel(
                    "source is restricted to fissionable material but no material is fissionable"
                        .to_string(),
                ));
            }
        }

        let mut tally_ids = HashSet::new();
        let mut filters: HashMap<u32, &Filter> = HashMap::new();
        for t in &self.tallies {
            t.validate()?;
            if !tally_ids.insert(t.id) {
                return Err(FetError::InvalidModel(format!("duplicate tally id {}", t.id)));
            }
            for f in &t.filters {
                match filters.get(&f.id()) {
                    Some(existing) if *existing != f => {
                        return Err(FetError::InvalidModel(format!(
                            "filter id {} is defined twice with different parameters",
                            f.id()
                        )))
                    }
                    Some(_) => {}
                    None => {
                        filters.insert(f.id(), f);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn tally(&self, id: u32) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.id == id)
    }

    /// Expansion window of tally `id`, from its spatial Legendre filter.
    pub fn expansion_window(&self, id: u32) -> FetResult<ExpansionWindow> {
        let tally = self
            .tally(id)
            .ok_or_else(|| FetError::InvalidModel(format!("no tally with id {id}")))?;
        match tally.spatial_legendre() {
            Some(Filter::SpatialLegendre {
                order,
                axis,
                minimum,
                maximum,
                ..
            }) => Ok(ExpansionWindow {
                order: *order,
                axis: *axis,
                minimum: *minimum,
                maximum: *maximum,
            }),
            None => Err(FetError::InvalidModel(format!(
                "tally {id} has no spatial Legendre filter"
            ))),
        }
    }

    pub fn materials_xml(&self) -> FetResult<String> {
        let mut root = Element::new("materials");
        for m in &self.materials {
            root.push(m.to_xml()?);
        }
        Ok(root.to_document())
    }

    pub fn geometry_xml(&self) -> String {
        self.geometry.to_xml().to_document()
    }

    pub fn settings_xml(&self) -> String {
        self.settings.to_xml().to_document()
    }

    pub fn tallies_xml(&self) -> String {
        let mut root = Element::new("tallies");
        let mut seen = HashSet::new();
        for t in &self.tallies {
            for f in &t.filters {
                if seen.insert(f.id()) {
                    root.push(f.to_xml());
                }
            }
        }
        for t in &self.tallies {
            root.push(t.to_xml());
        }
        root.to_document()
    }

    /// Validate and write the four input decks into `dir` (created if needed).
    pub fn export_xml(&self, dir: impl AsRef<Path>) -> FetResult<Vec<PathBuf>> {
        self.validate()?;
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let decks = [
            (MATERIALS_XML, self.materials_xml()?),
            (GEOMETRY_XML, self.geometry_xml()),
            (SETTINGS_XML, self.settings_xml()),
            (TALLIES_XML, self.tallies_xml()),
        ];
        let mut written = Vec::with_capacity(decks.len());
        for (name, contents) in decks {
            let path = dir.join(name);
            std::fs::write(&path, contents)?;
            log::debug!("wrote {}", path.display());
            written.push(path);
        }
        log::info!(
            "Exported model ({} materials, {} cells, {} tallies) to {}",
            self.materials.len(),
            self.geometry.cells.len(),
            self.tallies.len(),
            dir.display()
        );
        Ok(written)
    }

    /// JSON snapshot of the model, kept next to the decks for reproducibility.
    pub fn save_json(&self, path: impl AsRef<Path>) -> FetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> FetResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    /// Reference problem: fuel slabs on both sides of a thin B4C absorber,
    /// reflective in x/y, vacuum at the z ends, with a flux tally expanded
    /// in Legendre polynomials along the configured axis.
    pub fn tutorial(cfg: &TutorialConfig) -> FetResult<Self> {
        cfg.validate()?;
        let g = &cfg.geometry;

        let mut fuel = Material::new(1, "fuel");
        fuel.add_element_enriched("U", 1.0, cfg.materials.fuel_enrichment)
            .add_nuclide("O16", 2.0)
            .set_density(DensityUnits::GramsPerCc, cfg.materials.fuel_density);

        let mut b4c = Material::new(2, "b4c");
        b4c.add_element("B", 4.0)
            .add_element("C", 1.0)
            .set_density(DensityUnits::GramsPerCc, cfg.materials.absorber_density);

        let (sides, box_region) =
            rectangular_prism(g.box_width, g.box_width, BoundaryType::Reflective, 1);
        let bottom = Surface::z_plane(5, g.z_min).with_boundary(BoundaryType::Vacuum);
        let top = Surface::z_plane(8, g.z_max).with_boundary(BoundaryType::Vacuum);

        let mut geometry = Geometry::default();
        for s in sides {
            geometry.add_surface(s);
        }
        geometry.add_surface(bottom);

        let mut materials = vec![fuel];
        if g.absorber_thickness > 0.0 {
            let half = 0.5 * g.absorber_thickness;
            let absorber_lower = Surface::z_plane(6, -half);
            let absorber_upper = Surface::z_plane(7, half);
            geometry
                .add_surface(absorber_lower)
                .add_surface(absorber_upper)
                .add_surface(top)
                .add_cell(Cell::new(
                    1,
                    "fuel-lower",
                    Some(1),
                    box_region.clone() & bottom.positive() & absorber_lower.negative(),
                ))
                .add_cell(Cell::new(
                    2,
                    "absorber",
                    Some(2),
                    box_region.clone() & absorber_lower.positive() & absorber_upper.negative(),
                ))
                .add_cell(Cell::new(
                    3,
                    "fuel-upper",
                    Some(1),
                    box_region & absorber_upper.positive() & top.negative(),
                ));
            materials.push(b4c);
        } else {
            geometry.add_surface(top).add_cell(Cell::new(
                1,
                "fuel",
                Some(1),
                box_region & bottom.positive() & top.negative(),
            ));
        }

        let fissionable = materials.iter().any(Material::is_fissionable);
        let space = SpatialDistribution::from_bounding_box(&geometry.bounding_box(), fissionable)?;
        let settings = Settings {
            run_mode: RunMode::Eigenvalue,
            batches: cfg.settings.batches,
            inactive: cfg.settings.inactive,
            particles: cfg.settings.particles,
            source: Some(Source::new(space)),
            seed: cfg.settings.seed,
            output_tallies: true,
        };

        let (minimum, maximum) = cfg.window();
        let tally = Tally::new(TUTORIAL_TALLY_ID, &cfg.expansion.score)
            .with_score(&cfg.expansion.score)
            .with_filter(Filter::spatial_legendre(
                1,
                cfg.expansion.order,
                cfg.expansion.axis,
                minimum,
                maximum,
            ));

        let model = Model {
            materials,
            geometry,
            settings,
            tallies: vec![tally],
        };
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_model_layout() {
        let model = Model::tutorial(&TutorialConfig::default()).unwrap();
        assert_eq!(model.materials.len(), 2);
        assert_eq!(model.geometry.cells.len(), 3);
        assert_eq!(model.geometry.surfaces.len(), 8);
        assert_eq!(model.settings.batches, 210);

        let bb = model.geometry.bounding_box();
        assert_eq!(bb.lower_left, [-5.0, -5.0, -10.0]);
        assert_eq!(bb.upper_right, [5.0, 5.0, 10.0]);

        let w = model.expansion_window(TUTORIAL_TALLY_ID).unwrap();
        assert_eq!(w.order, 8);
        assert_eq!(w.axis, Axis::Z);
        assert!((w.half_width() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_tutorial_regions() {
        let model = Model::tutorial(&TutorialConfig::default()).unwrap();
        let regions: Vec<String> = model
            .geometry
            .cells
            .iter()
            .map(|c| c.region.to_string())
            .collect();
        assert_eq!(regions[0], "1 -2 3 -4 5 -6");
        assert_eq!(regions[1], "1 -2 3 -4 6 -7");
        assert_eq!(regions[2], "1 -2 3 -4 7 -8");
    }

    #[test]
    fn test_tutorial_without_absorber() {
        let mut cfg = TutorialConfig::default();
        cfg.geometry.absorber_thickness = 0.0;
        let model = Model::tutorial(&cfg).unwrap();
        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.geometry.cells.len(), 1);
        assert_eq!(model.geometry.cells[0].region.to_string(), "1 -2 3 -4 5 -8");
    }

    #[test]
    fn test_absorber_free_slab_off_origin() {
        let mut cfg = TutorialConfig::default();
        cfg.geometry.absorber_thickness = 0.0;
        cfg.geometry.z_min = 0.0;
        cfg.geometry.z_max = 20.0;
        let model = Model::tutorial(&cfg).unwrap();
        let w = model.expansion_window(TUTORIAL_TALLY_ID).unwrap();
        assert_eq!((w.minimum, w.maximum), (0.0, 20.0));
    }

    #[test]
    fn test_fissionable_source_needs_fuel() {
        let mut model = Model::tutorial(&TutorialConfig::default()).unwrap();
        assert!(matches!(
            model.settings.source.map(|s| s.space),
            Some(SpatialDistribution::Box {
                only_fissionable: true,
                ..
            })
        ));
        model.materials.retain(|m| !m.is_fissionable());
        for cell in &mut model.geometry.cells {
            cell.fill = Some(2);
        }
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("fissionable"), "{err}");
    }

    #[test]
    fn test_unknown_fill_rejected() {
        let mut model = Model::tutorial(&TutorialConfig::default()).unwrap();
        model.geometry.cells[1].fill = Some(42);
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("unknown material 42"), "{err}");
    }

    #[test]
    fn test_conflicting_filter_ids_rejected() {
        let mut model = Model::tutorial(&TutorialConfig::default()).unwrap();
        model.tallies.push(
            Tally::new(2, "other")
                .with_score("fission")
                .with_filter(Filter::spatial_legendre(1, 3, Axis::Z, -10.0, 10.0)),
        );
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_shared_filter_exported_once() {
        let mut model = Model::tutorial(&TutorialConfig::default()).unwrap();
        let shared = model.tallies[0].filters[0].clone();
        model
            .tallies
            .push(Tally::new(2, "fission").with_score("fission").with_filter(shared));
        model.validate().unwrap();
        let xml = model.tallies_xml();
        assert_eq!(xml.matches("<filter ").count(), 1);
        assert_eq!(xml.matches("<tally ").count(), 2);
    }

    #[test]
    fn test_missing_window() {
        let mut model = Model::tutorial(&TutorialConfig::default()).unwrap();
        model.tallies[0].filters.clear();
        assert!(model.expansion_window(TUTORIAL_TALLY_ID).is_err());
        assert!(model.expansion_window(7).is_err());
    }

    #[test]
    fn test_export_writes_decks() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::tutorial(&TutorialConfig::default()).unwrap();
        let written = model.export_xml(dir.path().join("run")).unwrap();
        assert_eq!(written.len(), 4);
        for p in &written {
            assert!(p.exists(), "{} missing", p.display());
        }
        let geom = std::fs::read_to_string(dir.path().join("run").join(GEOMETRY_XML)).unwrap();
        assert!(geom.contains("boundary=\"reflective\""));
        assert!(geom.contains("boundary=\"vacuum\""));
        assert!(geom.contains("name=\"absorber\""));
        let mats = std::fs::read_to_string(dir.path().join("run").join(MATERIALS_XML)).unwrap();
        assert!(mats.contains("name=\"U235\""));
        assert!(mats.contains("name=\"B10\""));
    }

    #[test]
    fn test_json_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = Model::tutorial(&TutorialConfig::default()).unwrap();
        model.save_json(&path).unwrap();
        let back = Model::load_json(&path).unwrap();
        assert_eq!(model, back);
    }
}
