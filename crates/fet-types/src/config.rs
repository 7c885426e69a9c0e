// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::*;
use crate::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Top-level configuration of the expansion-tally tutorial run.
/// Every section is optional in JSON; missing fields fall back to the
/// reference slab problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialConfig {
    pub name: String,
    pub geometry: SlabGeometryConfig,
    pub materials: MaterialsConfig,
    pub settings: RunSettingsConfig,
    pub expansion: ExpansionConfig,
    pub post: PostProcessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabGeometryConfig {
    /// Side of the reflective square box [cm].
    pub box_width: f64,
    /// Bottom vacuum plane [cm].
    pub z_min: f64,
    /// Top vacuum plane [cm].
    pub z_max: f64,
    /// Absorber slab thickness, centred on z = 0 [cm].
    pub absorber_thickness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    /// U-235 enrichment [wt%].
    pub fuel_enrichment: f64,
    /// Fuel density [g/cm³].
    pub fuel_density: f64,
    /// B4C density [g/cm³].
    pub absorber_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettingsConfig {
    pub batches: u32,
    pub inactive: u32,
    pub particles: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Highest Legendre order tallied (orders 0..=order).
    pub order: usize,
    pub axis: Axis,
    /// Tally score, e.g. "flux".
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Points of the reconstruction grid.
    pub grid_points: usize,
    /// Relative tolerance of the integral check.
    pub integral_tolerance: f64,
}

/// Cartesian axis of a spatial expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn parse(s: &str) -> FetResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(FetError::ConfigError(format!(
                "axis must be one of x, y, z; got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for TutorialConfig {
    fn default() -> Self {
        TutorialConfig {
            name: "legendre-fet-slab".to_string(),
            geometry: SlabGeometryConfig::default(),
            materials: MaterialsConfig::default(),
            settings: RunSettingsConfig::default(),
            expansion: ExpansionConfig::default(),
            post: PostProcessConfig::default(),
        }
    }
}

impl Default for SlabGeometryConfig {
    fn default() -> Self {
        SlabGeometryConfig {
            box_width: BOX_WIDTH_CM,
            z_min: Z_MIN_CM,
            z_max: Z_MAX_CM,
            absorber_thickness: ABSORBER_THICKNESS_CM,
        }
    }
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        MaterialsConfig {
            fuel_enrichment: FUEL_ENRICHMENT_PCT,
            fuel_density: FUEL_DENSITY_G_CC,
            absorber_density: ABSORBER_DENSITY_G_CC,
        }
    }
}

impl Default for RunSettingsConfig {
    fn default() -> Self {
        RunSettingsConfig {
            batches: DEFAULT_BATCHES,
            inactive: DEFAULT_INACTIVE,
            particles: DEFAULT_PARTICLES,
            seed: None,
        }
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            order: DEFAULT_EXPANSION_ORDER,
            axis: Axis::Z,
            score: "flux".to_string(),
        }
    }
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        PostProcessConfig {
            grid_points: DEFAULT_PROFILE_POINTS,
            integral_tolerance: DEFAULT_INTEGRAL_TOLERANCE,
        }
    }
}

impl TutorialConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> FetResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> FetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Expansion window along the tally axis, (min, max).
    /// Transverse axes span the box, the z axis spans the vacuum planes.
    pub fn window(&self) -> (f64, f64) {
        match self.expansion.axis {
            Axis::Z => (self.geometry.z_min, self.geometry.z_max),
            Axis::X | Axis::Y => {
                let half = 0.5 * self.geometry.box_width;
                (-half, half)
            }
        }
    }

    pub fn validate(&self) -> FetResult<()> {
        let g = &self.geometry;
        if !(g.z_min.is_finite() && g.z_max.is_finite()) || g.z_min >= g.z_max {
            return Err(FetError::ConfigError(format!(
                "z_min must be < z_max, got [{}, {}]",
                g.z_min, g.z_max
            )));
        }
        if !g.box_width.is_finite() || g.box_width <= 0.0 {
            return Err(FetError::ConfigError(format!(
                "box_width must be finite and > 0, got {}",
                g.box_width
            )));
        }
        if g.absorber_thickness < 0.0 || g.absorber_thickness >= g.z_max - g.z_min {
            return Err(FetError::ConfigError(format!(
                "absorber_thickness must lie in [0, {}), got {}",
                g.z_max - g.z_min,
                g.absorber_thickness
            )));
        }
        let half = 0.5 * g.absorber_thickness;
        if half > 0.0 && (-half <= g.z_min || half >= g.z_max) {
            return Err(FetError::ConfigError(format!(
                "absorber slab [{}, {}] must sit strictly inside [{}, {}]",
                -half, half, g.z_min, g.z_max
            )));
        }

        let m = &self.materials;
        if !(0.0..=100.0).contains(&m.fuel_enrichment) {
            return Err(FetError::ConfigError(format!(
                "fuel_enrichment must be in [0, 100] wt%, got {}",
                m.fuel_enrichment
            )));
        }
        if m.fuel_density <= 0.0 || m.absorber_density <= 0.0 {
            return Err(FetError::ConfigError(
                "material densities must be > 0".to_string(),
            ));
        }

        let s = &self.settings;
        if s.particles == 0 {
            return Err(FetError::ConfigError("particles must be > 0".to_string()));
        }
        if s.batches <= s.inactive {
            return Err(FetError::ConfigError(format!(
                "batches ({}) must exceed inactive batches ({})",
                s.batches, s.inactive
            )));
        }

        if self.expansion.score.trim().is_empty() {
            return Err(FetError::ConfigError("expansion score is empty".to_string()));
        }
        if self.post.grid_points < 2 {
            return Err(FetError::ConfigError(format!(
                "grid_points must be >= 2, got {}",
                self.post.grid_points
            )));
        }
        let tol = self.post.integral_tolerance;
        if !tol.is_finite() || tol <= 0.0 {
            return Err(FetError::ConfigError(
                "integral_tolerance must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_reference_problem() {
        let cfg = TutorialConfig::default();
        assert_eq!(cfg.expansion.order, 8);
        assert_eq!(cfg.expansion.axis, Axis::Z);
        assert_eq!(cfg.settings.batches, 210);
        assert_eq!(cfg.settings.inactive, 10);
        assert_eq!(cfg.settings.particles, 1000);
        assert_eq!(cfg.window(), (-10.0, 10.0));
        cfg.validate().unwrap();
    }

    #[test]
    fn test_transverse_window_spans_box() {
        let mut cfg = TutorialConfig::default();
        cfg.expansion.axis = Axis::X;
        assert_eq!(cfg.window(), (-5.0, 5.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let file = write_json(r#"{ "expansion": { "order": 4 }, "settings": { "particles": 500 } }"#);
        let cfg = TutorialConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.expansion.order, 4);
        assert_eq!(cfg.expansion.score, "flux");
        assert_eq!(cfg.settings.particles, 500);
        assert_eq!(cfg.settings.batches, 210);
        assert!((cfg.geometry.box_width - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!(Axis::parse("Z").unwrap(), Axis::Z);
        assert_eq!(Axis::parse(" x ").unwrap(), Axis::X);
        assert!(Axis::parse("r").is_err());
        let file = write_json(r#"{ "expansion": { "axis": "y" } }"#);
        let cfg = TutorialConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.expansion.axis, Axis::Y);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let file = write_json(r#"{ "geometry": { "z_min": 5.0, "z_max": -5.0 } }"#);
        let err = TutorialConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FetError::ConfigError(_)), "{err}");
    }

    #[test]
    fn test_rejects_inactive_exceeding_batches() {
        let mut cfg = TutorialConfig::default();
        cfg.settings.inactive = cfg.settings.batches;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_absorber_outside_window() {
        let mut cfg = TutorialConfig::default();
        cfg.geometry.z_min = 1.0;
        cfg.geometry.z_max = 10.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_absorber_free_slab_may_skip_origin() {
        let mut cfg = TutorialConfig::default();
        cfg.geometry.absorber_thickness = 0.0;
        cfg.geometry.z_min = 0.0;
        cfg.geometry.z_max = 20.0;
        cfg.validate().unwrap();
        cfg.geometry.absorber_thickness = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let file = write_json("{ not json");
        let err = TutorialConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FetError::Json(_)));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fet.json");
        let mut cfg = TutorialConfig::default();
        cfg.settings.seed = Some(7);
        cfg.save(&path).unwrap();
        let cfg2 = TutorialConfig::from_file(&path).unwrap();
        assert_eq!(cfg.name, cfg2.name);
        assert_eq!(cfg2.settings.seed, Some(7));
        assert_eq!(cfg.expansion.order, cfg2.expansion.order);
    }
}
