// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Reconstruction Report
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Profile tables (`z,phi` CSV and `.npy`) and the JSON run summary.

use crate::expansion::IntegralCheck;
use fet_model::ExpansionWindow;
use fet_types::error::{FetError, FetResult};
use fet_types::state::FluxProfile;
use ndarray::{Array1, Array2, Axis};
use ndarray_npy::{read_npy, write_npy};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct ProfileRow {
    z: f64,
    phi: f64,
}

pub fn write_profile_csv(path: impl AsRef<Path>, profile: &FluxProfile) -> FetResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for (z, phi) in profile.z.iter().zip(profile.phi.iter()) {
        writer.serialize(ProfileRow { z: *z, phi: *phi })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_profile_csv(path: impl AsRef<Path>) -> FetResult<FluxProfile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;
    let mut z = Vec::new();
    let mut phi = Vec::new();
    for row in reader.deserialize::<ProfileRow>() {
        let row = row?;
        z.push(row.z);
        phi.push(row.phi);
    }
    Ok(FluxProfile::new(Array1::from(z), Array1::from(phi)))
}

/// `[n, 2]` array, columns (z, φ).
pub fn write_profile_npy(path: impl AsRef<Path>, profile: &FluxProfile) -> FetResult<()> {
    let path = path.as_ref();
    let table = ndarray::stack(Axis(1), &[profile.z.view(), profile.phi.view()])
        .map_err(|e| FetError::Output(format!("profile shape: {e}")))?;
    write_npy(path, &table)
        .map_err(|e| FetError::Output(format!("failed to write {}: {e}", path.display())))
}

pub fn read_profile_npy(path: impl AsRef<Path>) -> FetResult<FluxProfile> {
    let path = path.as_ref();
    let table: Array2<f64> = read_npy(path)
        .map_err(|e| FetError::Output(format!("failed to read {}: {e}", path.display())))?;
    if table.ncols() != 2 {
        return Err(FetError::Output(format!(
            "{}: expected 2 columns (z, phi), found {}",
            path.display(),
            table.ncols()
        )));
    }
    Ok(FluxProfile::new(
        table.column(0).to_owned(),
        table.column(1).to_owned(),
    ))
}

/// Everything needed to reproduce a reconstruction without the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub tally_id: u32,
    pub score: String,
    pub nuclide: String,
    pub window: ExpansionWindow,
    pub moments: Vec<f64>,
    pub std_devs: Vec<f64>,
    /// Series coefficients a_n / h.
    pub coefficients: Vec<f64>,
    pub integral: IntegralCheck,
    /// Trapezoid integral of the sampled profile.
    pub grid_integral: f64,
    /// (z, φ) at the profile maximum.
    pub peak: Option<(f64, f64)>,
}

impl Summary {
    pub fn save_json(&self, path: impl AsRef<Path>) -> FetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> FetResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
