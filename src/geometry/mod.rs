//! Parameter → part list. Every function here is pure; shapes are only described, never built.

mod clearance;
mod horizontal;
pub mod mesh;
mod peripherals;
mod vertical;

use std::collections::HashSet;

use crate::foundation::core::{Axis, Rgb, Vec3};
use crate::foundation::error::{LineError, LineResult};
use crate::params::{ParameterSet, ProcessMode};

pub use clearance::interferences;
pub use horizontal::{coil_offsets, induction_catalog};
pub use peripherals::OVERLAY_CAPTIONS;
pub use vertical::{casting_catalog, guide_roller_levels, spray_levels};

pub mod palette {
    use crate::foundation::core::Rgb;

    pub const STEEL: Rgb = Rgb::new(0.6, 0.6, 0.6);
    pub const COPPER: Rgb = Rgb::new(0.72, 0.45, 0.20);
    pub const MOLD_COPPER: Rgb = Rgb::new(0.9, 0.6, 0.2);
    pub const TUNDISH: Rgb = Rgb::new(0.8, 0.7, 0.5);
    pub const SPRAY: Rgb = Rgb::new(0.2, 0.6, 0.9);
    pub const ROLLER: Rgb = Rgb::new(0.3, 0.3, 0.3);
    pub const GUIDE_ROLLER: Rgb = Rgb::new(0.3, 0.3, 0.35);
    pub const COLUMN: Rgb = Rgb::new(0.4, 0.4, 0.5);
    pub const SENSOR: Rgb = Rgb::new(0.95, 0.9, 0.2);
    pub const PIPE_IN: Rgb = Rgb::new(0.2, 0.5, 0.8);
    pub const PIPE_OUT: Rgb = Rgb::new(0.8, 0.2, 0.2);
    pub const PANEL: Rgb = Rgb::new(0.9, 0.6, 0.1);
    pub const LABEL: Rgb = Rgb::new(1.0, 1.0, 0.4);
}

/// A kernel primitive. Boxes sit on their min corner; cylinders and tori are centred on the
/// origin with their axis along +Z (cylinders extend from z=0 to z=height).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Cuboid { dx: f64, dy: f64, dz: f64 },
    Cylinder { radius: f64, height: f64 },
    Torus { major_radius: f64, minor_radius: f64 },
}

impl Primitive {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Cuboid { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Torus { .. } => "torus",
        }
    }

    pub fn dimensions(&self) -> Vec<f64> {
        match *self {
            Self::Cuboid { dx, dy, dz } => vec![dx, dy, dz],
            Self::Cylinder { radius, height } => vec![radius, height],
            Self::Torus {
                major_radius,
                minor_radius,
            } => vec![major_radius, minor_radius],
        }
    }
}

/// Solid descriptor: a primitive or a boolean difference of two solids.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solid {
    Primitive(Primitive),
    Cut { base: Box<Solid>, tool: Box<Solid> },
}

impl Solid {
    pub fn cuboid(dx: f64, dy: f64, dz: f64) -> Self {
        Self::Primitive(Primitive::Cuboid { dx, dy, dz })
    }

    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self::Primitive(Primitive::Cylinder { radius, height })
    }

    pub fn torus(major_radius: f64, minor_radius: f64) -> Self {
        Self::Primitive(Primitive::Torus {
            major_radius,
            minor_radius,
        })
    }

    pub fn cut(self, tool: Solid) -> Self {
        Self::Cut {
            base: Box::new(self),
            tool: Box::new(tool),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.kind_name(),
            Self::Cut { .. } => "compound",
        }
    }

    /// All lengths of the descriptor, depth-first.
    pub fn dimensions(&self) -> Vec<f64> {
        match self {
            Self::Primitive(p) => p.dimensions(),
            Self::Cut { base, tool } => {
                let mut out = base.dimensions();
                out.extend(tool.dimensions());
                out
            }
        }
    }
}

/// Rotation about an axis through the origin, applied before the part offset.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rotation {
    pub axis: Axis,
    pub degrees: f64,
}

/// Logical collection used for review in the document tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PartGroup {
    Heating,
    Transport,
    Structure,
    Cooling,
    Control,
}

impl PartGroup {
    pub const ALL: [PartGroup; 5] = [
        Self::Heating,
        Self::Transport,
        Self::Structure,
        Self::Cooling,
        Self::Control,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Heating => "01_heating",
            Self::Transport => "02_transport",
            Self::Structure => "03_structure",
            Self::Cooling => "04_cooling",
            Self::Control => "05_control",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Billet,
    Strand,
    Mold,
    Tundish,
    Coil,
    Roller,
    GuideRoller,
    SprayNozzle,
    Column,
    Sensor,
    Pipe,
    ControlPanel,
    Equipment,
    SafetyPost,
}

impl PartKind {
    pub const ALL: [PartKind; 14] = [
        Self::Billet,
        Self::Strand,
        Self::Mold,
        Self::Tundish,
        Self::Coil,
        Self::Roller,
        Self::GuideRoller,
        Self::SprayNozzle,
        Self::Column,
        Self::Sensor,
        Self::Pipe,
        Self::ControlPanel,
        Self::Equipment,
        Self::SafetyPost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Billet => "billet",
            Self::Strand => "strand",
            Self::Mold => "mold",
            Self::Tundish => "tundish",
            Self::Coil => "induction coil",
            Self::Roller => "transport roller",
            Self::GuideRoller => "guide roller",
            Self::SprayNozzle => "spray nozzle",
            Self::Column => "support column",
            Self::Sensor => "temperature sensor",
            Self::Pipe => "cooling pipe",
            Self::ControlPanel => "control panel",
            Self::Equipment => "equipment block",
            Self::SafetyPost => "safety post",
        }
    }
}

/// One physical part: what to build, where to put it and how to paint it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
    pub group: PartGroup,
    pub solid: Solid,
    pub rotation: Option<Rotation>,
    pub offset: Vec3,
    pub color: Rgb,
}

impl Part {
    pub fn new(
        name: impl Into<String>,
        kind: PartKind,
        group: PartGroup,
        solid: Solid,
        color: Rgb,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            group,
            solid,
            rotation: None,
            offset: Vec3::ZERO,
            color,
        }
    }

    pub fn rotated(mut self, axis: Axis, degrees: f64) -> Self {
        self.rotation = Some(Rotation { axis, degrees });
        self
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offset = Vec3::new(x, y, z);
        self
    }
}

/// Floating caption attached near a piece of equipment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    pub text: String,
    pub position: Vec3,
    pub size: f64,
    pub color: Rgb,
}

impl Annotation {
    pub fn new(text: impl Into<String>, position: Vec3, size: f64) -> Self {
        Self {
            text: text.into(),
            position,
            size,
            color: palette::LABEL,
        }
    }
}

/// Direction of motion along the body's axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Travel {
    Forward,
    Backward,
}

/// The single part whose placement follows the animation.
///
/// The part's local origin is its trailing edge along `axis`, so the body spans
/// `[coord, coord + length]` for any placement coordinate `coord`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovingBody {
    pub part: String,
    pub axis: Axis,
    pub travel: Travel,
    pub length: f64,
    /// Placement coordinate of the static (non-animated) model.
    pub rest: f64,
}

impl MovingBody {
    pub fn placement(&self, coord: f64) -> Vec3 {
        self.axis.unit() * coord
    }

    /// `(leading, trailing)` edge coordinates for a placement coordinate.
    pub fn edges(&self, coord: f64) -> (f64, f64) {
        match self.travel {
            Travel::Forward => (coord + self.length, coord),
            Travel::Backward => (coord, coord + self.length),
        }
    }
}

/// Output of a process catalog.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartCatalog {
    pub parts: Vec<Part>,
    pub annotations: Vec<Annotation>,
    pub moving: MovingBody,
}

impl PartCatalog {
    pub fn count(&self, kind: PartKind) -> usize {
        self.parts.iter().filter(|p| p.kind == kind).count()
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Interpenetrating pairs among the fixed parts. The moving body passes through its guides
    /// by construction and is left out.
    pub fn interferences(&self) -> Vec<(&str, &str)> {
        interferences(self.parts.iter().filter(|p| p.name != self.moving.part))
    }
}

/// The animated body of the selected process variant, as its catalog lists it.
pub fn moving_body(params: &ParameterSet) -> MovingBody {
    match &params.mode {
        ProcessMode::VerticalCasting(p) => vertical::strand_body(p, params.scale),
        ProcessMode::HorizontalInduction(p) => horizontal::billet_body(p, params.scale),
    }
}

/// Validate the parameter table, then run the catalog of the selected process variant.
#[tracing::instrument(skip(params), fields(mode = params.mode.name(), scale = params.scale))]
pub fn build_catalog(params: &ParameterSet) -> LineResult<PartCatalog> {
    params.validate()?;

    let catalog = match &params.mode {
        ProcessMode::VerticalCasting(p) => casting_catalog(p, params.scale),
        ProcessMode::HorizontalInduction(p) => induction_catalog(p, params.scale),
    };

    let mut seen = HashSet::with_capacity(catalog.parts.len());
    for part in &catalog.parts {
        if !seen.insert(part.name.as_str()) {
            return Err(LineError::config(format!(
                "duplicate part name '{}'",
                part.name
            )));
        }
        if let Some(bad) = part.solid.dimensions().into_iter().find(|v| *v <= 0.0) {
            return Err(LineError::config(format!(
                "part '{}' resolves to non-positive dimension {bad}",
                part.name
            )));
        }
    }
    if catalog.part(&catalog.moving.part).is_none() {
        return Err(LineError::config(format!(
            "moving body '{}' is not in the catalog",
            catalog.moving.part
        )));
    }
    if let Some((a, b)) = catalog.interferences().first() {
        return Err(LineError::config(format!("parts '{a}' and '{b}' overlap")));
    }

    tracing::debug!(
        parts = catalog.parts.len(),
        annotations = catalog.annotations.len(),
        "catalog built"
    );
    Ok(catalog)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/catalog.rs"]
mod tests;
