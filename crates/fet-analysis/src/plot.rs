// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Figures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! SVG figures of reconstructed profiles and raw moments.
//!
//! SVG only, so no system fonts are needed. A `.png` path is rewritten to
//! `.svg`; every function returns the file actually written.

use crate::expansion::ConvergenceStep;
use fet_types::error::{FetError, FetResult};
use fet_types::state::FluxProfile;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::{Path, PathBuf};

const SIZE: (u32, u32) = (800, 500);

fn plot_err<E: std::fmt::Display>(e: E) -> FetError {
    FetError::Output(format!("plot: {e}"))
}

fn svg_path(path: &Path) -> PathBuf {
    if path.extension().map(|e| e == "png").unwrap_or(false) {
        path.with_extension("svg")
    } else {
        path.to_path_buf()
    }
}

/// Axis range with 5 % headroom; unit range around a constant.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(hi.abs()).max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

fn placeholder(root: &DrawingArea<SVGBackend<'_>, Shift>, msg: &str) -> FetResult<()> {
    root.draw(&Text::new(
        msg,
        ((SIZE.0 / 2) as i32, (SIZE.1 / 2) as i32),
        ("sans-serif", 20).into_font().color(&BLACK),
    ))
    .map_err(plot_err)?;
    root.present().map_err(plot_err)
}

/// φ(z) line plot.
pub fn plot_profile(path: &Path, profile: &FluxProfile, title: &str) -> FetResult<PathBuf> {
    let out = svg_path(path);
    draw_profile(&out, profile, title)?;
    log::info!("Wrote {}", out.display());
    Ok(out)
}

fn draw_profile(out: &Path, profile: &FluxProfile, title: &str) -> FetResult<()> {
    let root = SVGBackend::new(out, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    if profile.is_empty() {
        return placeholder(&root, "No profile data");
    }

    let (z_lo, z_hi) = (profile.z[0], profile.z[profile.len() - 1]);
    let (z_lo, z_hi) = if z_lo < z_hi { (z_lo, z_hi) } else { padded(z_lo, z_hi) };
    let (phi_lo, phi_hi) = profile.range();
    let (y_lo, y_hi) = padded(phi_lo.min(0.0), phi_hi);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(z_lo..z_hi, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("z (cm)")
        .y_desc("Flux")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            profile
                .z
                .iter()
                .zip(profile.phi.iter())
                .filter(|(_, p)| p.is_finite())
                .map(|(z, p)| (*z, *p)),
            &BLUE,
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

/// Tally moments m_n with ±σ_n error bars against n.
pub fn plot_moments(path: &Path, moments: &[f64], std_devs: &[f64]) -> FetResult<PathBuf> {
    if moments.len() != std_devs.len() {
        return Err(FetError::Output(format!(
            "plot: {} moments but {} standard deviations",
            moments.len(),
            std_devs.len()
        )));
    }
    let out = svg_path(path);
    draw_moments(&out, moments, std_devs)?;
    log::info!("Wrote {}", out.display());
    Ok(out)
}

fn draw_moments(out: &Path, moments: &[f64], std_devs: &[f64]) -> FetResult<()> {
    let root = SVGBackend::new(out, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    if moments.is_empty() {
        return placeholder(&root, "No moments");
    }

    let (lo, hi) = moments
        .iter()
        .zip(std_devs.iter())
        .fold((0.0f64, 0.0f64), |(lo, hi), (m, s)| {
            (lo.min(m - s.abs()), hi.max(m + s.abs()))
        });
    let (y_lo, y_hi) = padded(lo, hi);
    let n = moments.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Legendre moments", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..n - 0.5, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Order n")
        .y_desc("m_n")
        .x_labels(moments.len())
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(moments.iter().zip(std_devs.iter()).enumerate().map(|(i, (m, s))| {
            ErrorBar::new_vertical(i as f64, m - s.abs(), *m, m + s.abs(), BLUE.filled(), 8)
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(
            moments
                .iter()
                .enumerate()
                .map(|(i, m)| Circle::new((i as f64, *m), 3, RED.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

/// Overlay of the profile at each truncation order.
pub fn plot_convergence(path: &Path, steps: &[ConvergenceStep]) -> FetResult<PathBuf> {
    let out = svg_path(path);
    draw_convergence(&out, steps)?;
    log::info!("Wrote {}", out.display());
    Ok(out)
}

fn draw_convergence(out: &Path, steps: &[ConvergenceStep]) -> FetResult<()> {
    let root = SVGBackend::new(out, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let first = match steps.iter().find(|s| !s.profile.is_empty()) {
        Some(s) => &s.profile,
        None => return placeholder(&root, "No convergence data"),
    };

    let (z_lo, z_hi) = padded(first.z[0], first.z[first.len() - 1]);
    let (lo, hi) = steps.iter().fold((0.0f64, f64::NEG_INFINITY), |(lo, hi), s| {
        let (a, b) = s.profile.range();
        (lo.min(a), hi.max(b))
    });
    let (y_lo, y_hi) = padded(lo, hi);

    let mut chart = ChartBuilder::on(&root)
        .caption("Truncation order convergence", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(z_lo..z_hi, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("z (cm)")
        .y_desc("Flux")
        .draw()
        .map_err(plot_err)?;

    for (i, step) in steps.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                step.profile
                    .z
                    .iter()
                    .zip(step.profile.phi.iter())
                    .map(|(z, p)| (*z, *p)),
                color,
            ))
            .map_err(plot_err)?
            .label(format!("P{}", step.order))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::{evaluate_profile, order_convergence, reconstruct};
    use fet_model::ExpansionWindow;
    use fet_types::config::Axis;
    use fet_types::state::AxialGrid;
    use ndarray::Array1;
    use tempfile::TempDir;

    fn window() -> ExpansionWindow {
        ExpansionWindow {
            order: 2,
            axis: Axis::Z,
            minimum: -10.0,
            maximum: 10.0,
        }
    }

    #[test]
    fn test_profile_svg() {
        let dir = TempDir::new().unwrap();
        let series = reconstruct(&[36.4348, 0.0, -6.9], &window()).unwrap();
        let profile = evaluate_profile(&series, &AxialGrid::new(200, -10.0, 10.0));
        let out = plot_profile(&dir.path().join("flux.svg"), &profile, "Flux").unwrap();
        let svg = std::fs::read_to_string(out).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("z (cm)"));
    }

    #[test]
    fn test_png_path_becomes_svg() {
        let dir = TempDir::new().unwrap();
        let profile = FluxProfile::new(Array1::linspace(0.0, 1.0, 5), Array1::ones(5));
        let out = plot_profile(&dir.path().join("flat.png"), &profile, "Flat").unwrap();
        assert_eq!(out.extension().unwrap(), "svg");
        assert!(out.exists());
    }

    #[test]
    fn test_empty_profile_placeholder() {
        let dir = TempDir::new().unwrap();
        let profile = FluxProfile::new(Array1::zeros(0), Array1::zeros(0));
        let out = plot_profile(&dir.path().join("empty.svg"), &profile, "Empty").unwrap();
        let svg = std::fs::read_to_string(out).unwrap();
        assert!(svg.contains("No profile data"));
    }

    #[test]
    fn test_moments_svg() {
        let dir = TempDir::new().unwrap();
        let out = plot_moments(
            &dir.path().join("moments.svg"),
            &[36.4, 0.01, -6.9],
            &[0.08, 0.04, 0.03],
        )
        .unwrap();
        assert!(out.exists());
        assert!(plot_moments(&dir.path().join("bad.svg"), &[1.0], &[]).is_err());
    }

    #[test]
    fn test_convergence_svg() {
        let dir = TempDir::new().unwrap();
        let steps = order_convergence(
            &[36.4348, 0.0, -6.9],
            &window(),
            &AxialGrid::new(50, -10.0, 10.0),
        )
        .unwrap();
        let out = plot_convergence(&dir.path().join("conv.svg"), &steps).unwrap();
        let svg = std::fs::read_to_string(out).unwrap();
        assert!(svg.contains("P2"));
        let empty = plot_convergence(&dir.path().join("none.svg"), &[]).unwrap();
        assert!(std::fs::read_to_string(empty).unwrap().contains("No convergence data"));
    }

    #[test]
    fn test_padded() {
        assert_eq!(padded(1.0, 1.0), (0.0, 2.0));
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = padded(0.0, 10.0);
        assert!(lo < 0.0 && hi > 10.0);
    }
}
