// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for fet-model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for fet-model using proptest.
//!
//! Covers: slab bounding boxes, reference model validity over the
//! configuration space, expansion window propagation.

use fet_model::geometry::{rectangular_prism, BoundaryType, Surface};
use fet_model::model::TUTORIAL_TALLY_ID;
use fet_model::Model;
use fet_types::config::TutorialConfig;
use proptest::prelude::*;

proptest! {
    /// A prism cut by two z planes has exactly the expected box.
    #[test]
    fn slab_bounding_box(
        width in 0.1f64..100.0,
        height in 0.1f64..100.0,
        z_lo in -100.0f64..0.0,
        thickness in 0.1f64..100.0,
    ) {
        let (_, prism) = rectangular_prism(width, height, BoundaryType::Reflective, 1);
        let lo = Surface::z_plane(5, z_lo);
        let hi = Surface::z_plane(6, z_lo + thickness);
        let bb = (prism & lo.positive() & hi.negative()).bounding_box();
        prop_assert!(bb.is_finite());
        prop_assert!((bb.width()[0] - width).abs() < 1e-9);
        prop_assert!((bb.width()[1] - height).abs() < 1e-9);
        prop_assert!((bb.width()[2] - thickness).abs() < 1e-9);
    }

    /// Every valid configuration yields a valid model whose tally window
    /// and source box follow the configuration.
    #[test]
    fn tutorial_model_follows_config(
        order in 0usize..24,
        half in 1.0f64..50.0,
        absorber_frac in 0.0f64..0.9,
        width in 1.0f64..40.0,
    ) {
        let mut cfg = TutorialConfig::default();
        cfg.expansion.order = order;
        cfg.geometry.z_min = -half;
        cfg.geometry.z_max = half;
        cfg.geometry.box_width = width;
        cfg.geometry.absorber_thickness = absorber_frac * half;

        let model = Model::tutorial(&cfg).unwrap();
        let w = model.expansion_window(TUTORIAL_TALLY_ID).unwrap();
        prop_assert_eq!(w.order, order);
        prop_assert!((w.minimum + half).abs() < 1e-12);
        prop_assert!((w.maximum - half).abs() < 1e-12);

        let bb = model.geometry.bounding_box();
        prop_assert!((bb.lower_left[2] + half).abs() < 1e-12);
        prop_assert!((bb.upper_right[0] - 0.5 * width).abs() < 1e-12);

        let tallies = model.tallies_xml();
        let order_tag = format!("<order>{}</order>", order);
        prop_assert!(tallies.contains(&order_tag));
    }
}
