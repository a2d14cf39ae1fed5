//! The assembly: a validated part catalog plus the bookkeeping that rides along with it.

mod composer;

use std::collections::BTreeMap;

use crate::foundation::error::LineResult;
use crate::geometry::{Part, PartCatalog, build_catalog};
use crate::params::{ParameterSet, ProcessMode};

pub use crate::geometry::PartGroup;
pub use composer::{ComposedAssembly, compose};

/// Steel density, kg/m³.
pub const STEEL_DENSITY: f64 = 7850.0;
pub const COIL_MASS_KG: f64 = 45.0;
pub const ROLLER_MASS_KG: f64 = 25.0;
pub const BASE_MASS_KG: f64 = 850.0;
pub const COIL_POWER_KW: f64 = 150.0;
/// Rated power of the vertical line's melting furnace.
pub const FURNACE_POWER_KW: f64 = 3500.0;

/// Mass and power estimate of the line, computed on the unscaled part table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SystemInfo {
    pub mode: String,
    pub body_section_mm: f64,
    pub body_length_mm: f64,
    pub body_mass_kg: f64,
    pub coil_count: u32,
    pub roller_count: u32,
    pub line_mass_kg: f64,
    pub power_kw: f64,
}

impl SystemInfo {
    pub fn from_params(params: &ParameterSet) -> Self {
        let (section, length, coils, rollers, power) = match &params.mode {
            ProcessMode::HorizontalInduction(p) => (
                p.billet_section,
                p.billet_length,
                p.coil_count,
                p.roller_count,
                f64::from(p.coil_count) * COIL_POWER_KW,
            ),
            ProcessMode::VerticalCasting(p) => (
                p.strand_section,
                p.strand_length,
                0,
                p.roller_pair_count * 2,
                if p.create_peripherals {
                    FURNACE_POWER_KW
                } else {
                    0.0
                },
            ),
        };
        let volume_m3 = (section / 1000.0).powi(2) * (length / 1000.0);
        let body_mass_kg = volume_m3 * STEEL_DENSITY;
        let line_mass_kg = body_mass_kg
            + f64::from(coils) * COIL_MASS_KG
            + f64::from(rollers) * ROLLER_MASS_KG
            + BASE_MASS_KG;
        Self {
            mode: params.mode.name().to_string(),
            body_section_mm: section,
            body_length_mm: length,
            body_mass_kg,
            coil_count: coils,
            roller_count: rollers,
            line_mass_kg,
            power_kw: power,
        }
    }

    /// Document comment text.
    pub fn comment(&self) -> String {
        let title = match self.mode.as_str() {
            "casting_vertical" => "VERTICAL CONTINUOUS CASTING LINE",
            _ => "BILLET INDUCTION HEATING LINE",
        };
        format!(
            "{title}\n\n\
             Body: {s}x{s}x{l} mm\n\
             Body mass: {bm:.0} kg\n\n\
             Coils: {c}\n\
             Rollers: {r}\n\
             Installed power: {p:.0} kW\n\n\
             Estimated line mass: {lm:.0} kg\n",
            s = self.body_section_mm,
            l = self.body_length_mm,
            bm = self.body_mass_kg,
            c = self.coil_count,
            r = self.roller_count,
            p = self.power_kw,
            lm = self.line_mass_kg,
        )
    }
}

/// Everything the composer pushes into a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Assembly {
    pub params: ParameterSet,
    pub catalog: PartCatalog,
    pub info: SystemInfo,
}

impl Assembly {
    /// Validate and build. Fails before any collaborator is touched.
    pub fn build(params: &ParameterSet) -> LineResult<Self> {
        let catalog = build_catalog(params)?;
        Ok(Self {
            params: params.clone(),
            catalog,
            info: SystemInfo::from_params(params),
        })
    }

    pub fn parts(&self) -> &[Part] {
        &self.catalog.parts
    }

    pub fn moving_part(&self) -> Option<&Part> {
        self.catalog.part(&self.catalog.moving.part)
    }

    /// Parts per logical group, every group present even when empty.
    pub fn grouped(&self) -> BTreeMap<PartGroup, Vec<&Part>> {
        let mut out: BTreeMap<PartGroup, Vec<&Part>> =
            PartGroup::ALL.iter().map(|g| (*g, Vec::new())).collect();
        for part in &self.catalog.parts {
            out.entry(part.group).or_default().push(part);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/assembly.rs"]
mod tests;
