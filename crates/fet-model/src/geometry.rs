// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — CSG Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Constructive solid geometry: surfaces, half-space regions, cells.
//!
//! Regions compose with `&` (intersection), `|` (union) and `!`
//! (complement), and render to the engine's region syntax, e.g.
//! `1 -2 3 -4 5 -6` or `(1 | -2) ~(3)`.

use crate::xml::{fmt_f64, Element};
use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryType {
    #[default]
    Transmission,
    Vacuum,
    Reflective,
    Periodic,
    White,
}

impl BoundaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryType::Transmission => "transmission",
            BoundaryType::Vacuum => "vacuum",
            BoundaryType::Reflective => "reflective",
            BoundaryType::Periodic => "periodic",
            BoundaryType::White => "white",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceKind {
    XPlane { x0: f64 },
    YPlane { y0: f64 },
    ZPlane { z0: f64 },
    ZCylinder { x0: f64, y0: f64, r: f64 },
    Sphere { x0: f64, y0: f64, z0: f64, r: f64 },
}

impl SurfaceKind {
    fn type_name(&self) -> &'static str {
        match self {
            SurfaceKind::XPlane { .. } => "x-plane",
            SurfaceKind::YPlane { .. } => "y-plane",
            SurfaceKind::ZPlane { .. } => "z-plane",
            SurfaceKind::ZCylinder { .. } => "z-cylinder",
            SurfaceKind::Sphere { .. } => "sphere",
        }
    }

    fn coeffs(&self) -> Vec<f64> {
        match *self {
            SurfaceKind::XPlane { x0 } => vec![x0],
            SurfaceKind::YPlane { y0 } => vec![y0],
            SurfaceKind::ZPlane { z0 } => vec![z0],
            SurfaceKind::ZCylinder { x0, y0, r } => vec![x0, y0, r],
            SurfaceKind::Sphere { x0, y0, z0, r } => vec![x0, y0, z0, r],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: u32,
    pub kind: SurfaceKind,
    pub boundary: BoundaryType,
}

impl Surface {
    pub fn new(id: u32, kind: SurfaceKind) -> Self {
        Surface {
            id,
            kind,
            boundary: BoundaryType::Transmission,
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryType) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn x_plane(id: u32, x0: f64) -> Self {
        Self::new(id, SurfaceKind::XPlane { x0 })
    }

    pub fn y_plane(id: u32, y0: f64) -> Self {
        Self::new(id, SurfaceKind::YPlane { y0 })
    }

    pub fn z_plane(id: u32, z0: f64) -> Self {
        Self::new(id, SurfaceKind::ZPlane { z0 })
    }

    pub fn z_cylinder(id: u32, x0: f64, y0: f64, r: f64) -> Self {
        Self::new(id, SurfaceKind::ZCylinder { x0, y0, r })
    }

    pub fn sphere(id: u32, x0: f64, y0: f64, z0: f64, r: f64) -> Self {
        Self::new(id, SurfaceKind::Sphere { x0, y0, z0, r })
    }

    /// Positive half-space (`+s`).
    pub fn positive(&self) -> Region {
        Region::Halfspace {
            surface: self.id,
            kind: self.kind,
            sense: Sense::Positive,
        }
    }

    /// Negative half-space (`-s`).
    pub fn negative(&self) -> Region {
        Region::Halfspace {
            surface: self.id,
            kind: self.kind,
            sense: Sense::Negative,
        }
    }

    fn validate(&self) -> FetResult<()> {
        let coeffs = self.kind.coeffs();
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(FetError::InvalidModel(format!(
                "surface {} has non-finite coefficients {:?}",
                self.id, coeffs
            )));
        }
        match self.kind {
            SurfaceKind::ZCylinder { r, .. } | SurfaceKind::Sphere { r, .. } if r <= 0.0 => Err(
                FetError::InvalidModel(format!("surface {} radius must be > 0, got {r}", self.id)),
            ),
            _ => Ok(()),
        }
    }

    pub(crate) fn to_xml(&self) -> Element {
        let coeffs: Vec<String> = self.kind.coeffs().into_iter().map(fmt_f64).collect();
        let mut el = Element::new("surface");
        if self.boundary != BoundaryType::Transmission {
            el = el.attr("boundary", self.boundary.as_str());
        }
        el.attr("coeffs", coeffs.join(" "))
            .attr("id", self.id)
            .attr("type", self.kind.type_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Positive,
    Negative,
}

/// CSG region expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Halfspace {
        surface: u32,
        kind: SurfaceKind,
        sense: Sense,
    },
    Intersection(Vec<Region>),
    Union(Vec<Region>),
    Complement(Box<Region>),
}

impl BitAnd for Region {
    type Output = Region;

    fn bitand(self, rhs: Region) -> Region {
        match (self, rhs) {
            (Region::Intersection(mut a), Region::Intersection(b)) => {
                a.extend(b);
                Region::Intersection(a)
            }
            (Region::Intersection(mut a), r) => {
                a.push(r);
                Region::Intersection(a)
            }
            (l, Region::Intersection(mut b)) => {
                b.insert(0, l);
                Region::Intersection(b)
            }
            (l, r) => Region::Intersection(vec![l, r]),
        }
    }
}

impl BitOr for Region {
    type Output = Region;

    fn bitor(self, rhs: Region) -> Region {
        match (self, rhs) {
            (Region::Union(mut a), Region::Union(b)) => {
                a.extend(b);
                Region::Union(a)
            }
            (Region::Union(mut a), r) => {
                a.push(r);
                Region::Union(a)
            }
            (l, Region::Union(mut b)) => {
                b.insert(0, l);
                Region::Union(b)
            }
            (l, r) => Region::Union(vec![l, r]),
        }
    }
}

impl Not for Region {
    type Output = Region;

    fn not(self) -> Region {
        Region::Complement(Box::new(self))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Halfspace { surface, sense, .. } => match sense {
                Sense::Positive => write!(f, "{surface}"),
                Sense::Negative => write!(f, "-{surface}"),
            },
            Region::Intersection(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match part {
                        Region::Union(_) => write!(f, "({part})")?,
                        _ => write!(f, "{part}")?,
                    }
                }
                Ok(())
            }
            Region::Union(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    match part {
                        Region::Intersection(_) => write!(f, "({part})")?,
                        _ => write!(f, "{part}")?,
                    }
                }
                Ok(())
            }
            Region::Complement(inner) => write!(f, "~({inner})"),
        }
    }
}

/// Axis-aligned bounding box; unbounded directions are ±∞.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
}

impl BoundingBox {
    pub fn infinite() -> Self {
        BoundingBox {
            lower_left: [f64::NEG_INFINITY; 3],
            upper_right: [f64::INFINITY; 3],
        }
    }

    pub fn empty() -> Self {
        BoundingBox {
            lower_left: [f64::INFINITY; 3],
            upper_right: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn intersect(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.lower_left[i] = self.lower_left[i].max(other.lower_left[i]);
            out.upper_right[i] = self.upper_right[i].min(other.upper_right[i]);
        }
        out
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.lower_left[i] = self.lower_left[i].min(other.lower_left[i]);
            out.upper_right[i] = self.upper_right[i].max(other.upper_right[i]);
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.lower_left
            .iter()
            .chain(self.upper_right.iter())
            .all(|v| v.is_finite())
    }

    pub fn width(&self) -> [f64; 3] {
        [
            self.upper_right[0] - self.lower_left[0],
            self.upper_right[1] - self.lower_left[1],
            self.upper_right[2] - self.lower_left[2],
        ]
    }
}

impl Region {
    /// Conservative bounding box of the region.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Region::Halfspace { kind, sense, .. } => halfspace_box(kind, *sense),
            Region::Intersection(parts) => parts
                .iter()
                .fold(BoundingBox::infinite(), |acc, p| acc.intersect(&p.bounding_box())),
            Region::Union(parts) => parts
                .iter()
                .fold(BoundingBox::empty(), |acc, p| acc.union(&p.bounding_box())),
            Region::Complement(_) => BoundingBox::infinite(),
        }
    }

    /// Surface ids referenced by the expression.
    pub fn surface_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        self.collect_surfaces(&mut ids);
        ids
    }

    fn collect_surfaces(&self, ids: &mut Vec<u32>) {
        match self {
            Region::Halfspace { surface, .. } => ids.push(*surface),
            Region::Intersection(parts) | Region::Union(parts) => {
                for p in parts {
                    p.collect_surfaces(ids);
                }
            }
            Region::Complement(inner) => inner.collect_surfaces(ids),
        }
    }
}

fn halfspace_box(kind: &SurfaceKind, sense: Sense) -> BoundingBox {
    let mut bb = BoundingBox::infinite();
    match (*kind, sense) {
        (SurfaceKind::XPlane { x0 }, Sense::Positive) => bb.lower_left[0] = x0,
        (SurfaceKind::XPlane { x0 }, Sense::Negative) => bb.upper_right[0] = x0,
        (SurfaceKind::YPlane { y0 }, Sense::Positive) => bb.lower_left[1] = y0,
        (SurfaceKind::YPlane { y0 }, Sense::Negative) => bb.upper_right[1] = y0,
        (SurfaceKind::ZPlane { z0 }, Sense::Positive) => bb.lower_left[2] = z0,
        (SurfaceKind::ZPlane { z0 }, Sense::Negative) => bb.upper_right[2] = z0,
        (SurfaceKind::ZCylinder { x0, y0, r }, Sense::Negative) => {
            bb.lower_left[0] = x0 - r;
            bb.upper_right[0] = x0 + r;
            bb.lower_left[1] = y0 - r;
            bb.upper_right[1] = y0 + r;
        }
        (SurfaceKind::Sphere { x0, y0, z0, r }, Sense::Negative) => {
            bb.lower_left = [x0 - r, y0 - r, z0 - r];
            bb.upper_right = [x0 + r, y0 + r, z0 + r];
        }
        _ => {}
    }
    bb
}

/// Four planes bounding a `width × height` rectangle centred on the z axis,
/// ids `first_id..first_id + 4` as (x-min, x-max, y-min, y-max).
/// Returns the surfaces and the enclosed region.
pub fn rectangular_prism(
    width: f64,
    height: f64,
    boundary: BoundaryType,
    first_id: u32,
) -> ([Surface; 4], Region) {
    let (hw, hh) = (0.5 * width, 0.5 * height);
    let xmin = Surface::x_plane(first_id, -hw).with_boundary(boundary);
    let xmax = Surface::x_plane(first_id + 1, hw).with_boundary(boundary);
    let ymin = Surface::y_plane(first_id + 2, -hh).with_boundary(boundary);
    let ymax = Surface::y_plane(first_id + 3, hh).with_boundary(boundary);
    let region = xmin.positive() & xmax.negative() & ymin.positive() & ymax.negative();
    ([xmin, xmax, ymin, ymax], region)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: u32,
    pub name: String,
    /// Material id; `None` is void.
    pub fill: Option<u32>,
    pub region: Region,
}

impl Cell {
    pub fn new(id: u32, name: &str, fill: Option<u32>, region: Region) -> Self {
        Cell {
            id,
            name: name.to_string(),
            fill,
            region,
        }
    }

    pub(crate) fn to_xml(&self) -> Element {
        let el = Element::new("cell").attr("id", self.id);
        let el = match self.fill {
            Some(m) => el.attr("material", m),
            None => el.attr("material", "void"),
        };
        el.attr("name", &self.name)
            .attr("region", self.region.to_string())
            .attr("universe", 0)
    }
}

/// Root-universe geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub surfaces: Vec<Surface>,
    pub cells: Vec<Cell>,
}

impl Geometry {
    pub fn add_surface(&mut self, surface: Surface) -> &mut Self {
        self.surfaces.push(surface);
        self
    }

    pub fn add_cell(&mut self, cell: Cell) -> &mut Self {
        self.cells.push(cell);
        self
    }

    /// Union of the cells' bounding boxes.
    pub fn bounding_box(&self) -> BoundingBox {
        self.cells
            .iter()
            .fold(BoundingBox::empty(), |acc, c| acc.union(&c.region.bounding_box()))
    }

    pub fn validate(&self) -> FetResult<()> {
        if self.cells.is_empty() {
            return Err(FetError::InvalidModel("geometry has no cells".to_string()));
        }
        let mut surface_ids = HashSet::new();
        for s in &self.surfaces {
            s.validate()?;
            if !surface_ids.insert(s.id) {
                return Err(FetError::InvalidModel(format!("duplicate surface id {}", s.id)));
            }
        }
        let mut cell_ids = HashSet::new();
        for c in &self.cells {
            if !cell_ids.insert(c.id) {
                return Err(FetError::InvalidModel(format!("duplicate cell id {}", c.id)));
            }
            for sid in c.region.surface_ids() {
                if !surface_ids.contains(&sid) {
                    return Err(FetError::InvalidModel(format!(
                        "cell {} references unknown surface {sid}",
                        c.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn to_xml(&self) -> Element {
        let mut root = Element::new("geometry");
        for c in &self.cells {
            root.push(c.to_xml());
        }
        for s in &self.surfaces {
            root.push(s.to_xml());
        }
        root
    }
}
