use super::defaults as d;

/// Selector constant for [`ProcessMode`]; the payload is filled from the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessModeKind {
    CastingVertical,
    InductionHorizontal,
}

/// Process variant with its own part catalog and thermal profile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProcessMode {
    #[serde(rename = "casting_vertical")]
    VerticalCasting(CastingParams),
    #[serde(rename = "induction_horizontal")]
    HorizontalInduction(InductionParams),
}

impl ProcessMode {
    pub fn from_kind(kind: ProcessModeKind) -> Self {
        match kind {
            ProcessModeKind::CastingVertical => Self::VerticalCasting(CastingParams::default()),
            ProcessModeKind::InductionHorizontal => {
                Self::HorizontalInduction(InductionParams::default())
            }
        }
    }

    pub fn kind(&self) -> ProcessModeKind {
        match self {
            Self::VerticalCasting(_) => ProcessModeKind::CastingVertical,
            Self::HorizontalInduction(_) => ProcessModeKind::InductionHorizontal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VerticalCasting(_) => "casting_vertical",
            Self::HorizontalInduction(_) => "induction_horizontal",
        }
    }

    /// Every length of the active variant, unscaled.
    pub fn dimensions(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::VerticalCasting(p) => p.dimensions(),
            Self::HorizontalInduction(p) => p.dimensions(),
        }
    }

    pub fn counts(&self) -> Vec<(&'static str, u32)> {
        match self {
            Self::VerticalCasting(p) => vec![
                ("spray_zone_count", p.spray_zone_count),
                ("roller_pair_count", p.roller_pair_count),
            ],
            Self::HorizontalInduction(p) => vec![
                ("coil_count", p.coil_count),
                ("roller_count", p.roller_count),
            ],
        }
    }

    /// Lengths derived from two parameters that must stay positive too.
    pub fn derived_dimensions(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::VerticalCasting(p) => vec![("mold_size", p.mold_size())],
            Self::HorizontalInduction(p) => vec![
                (
                    "coil_wall",
                    (p.coil_outer_diameter - p.coil_inner_diameter) / 2.0,
                ),
                (
                    "coil_bore_clearance",
                    (p.coil_inner_diameter - p.billet_section * std::f64::consts::SQRT_2) / 2.0,
                ),
            ],
        }
    }
}

/// Vertical continuous-casting strand with its casting peripherals.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CastingParams {
    pub strand_section: f64,
    pub strand_length: f64,
    pub mold_clearance: f64,
    pub mold_height: f64,
    pub tundish_width: f64,
    pub tundish_depth: f64,
    pub tundish_height: f64,
    pub tundish_gap: f64,
    pub spray_zone_count: u32,
    pub spray_spacing: f64,
    pub spray_nozzle_radius: f64,
    pub spray_nozzle_length: f64,
    pub spray_ring_gap: f64,
    pub roller_pair_count: u32,
    pub roller_pitch_ratio: f64, // fraction of spray_spacing
    pub guide_roller_radius: f64,
    pub guide_roller_length: f64,
    pub guide_roller_offset: f64,
    /// Minimum gap between a guide roller and the mold or a spray nozzle.
    pub guide_roller_clearance: f64,
    pub create_peripherals: bool,
    pub spray_width: f64,
    pub spray_cooling_peak: f64, // °C
    pub motion_margin: f64,
}

impl CastingParams {
    pub fn mold_size(&self) -> f64 {
        self.strand_section + self.mold_clearance
    }

    pub fn dimensions(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("strand_section", self.strand_section),
            ("strand_length", self.strand_length),
            ("mold_clearance", self.mold_clearance),
            ("mold_height", self.mold_height),
            ("tundish_width", self.tundish_width),
            ("tundish_depth", self.tundish_depth),
            ("tundish_height", self.tundish_height),
            ("tundish_gap", self.tundish_gap),
            ("spray_spacing", self.spray_spacing),
            ("spray_nozzle_radius", self.spray_nozzle_radius),
            ("spray_nozzle_length", self.spray_nozzle_length),
            ("spray_ring_gap", self.spray_ring_gap),
            ("guide_roller_radius", self.guide_roller_radius),
            ("guide_roller_length", self.guide_roller_length),
            ("guide_roller_offset", self.guide_roller_offset),
            ("guide_roller_clearance", self.guide_roller_clearance),
            ("spray_width", self.spray_width),
            ("motion_margin", self.motion_margin),
        ]
    }
}

impl Default for CastingParams {
    fn default() -> Self {
        Self {
            strand_section: d::STRAND_SECTION,
            strand_length: d::STRAND_LENGTH,
            mold_clearance: d::MOLD_CLEARANCE,
            mold_height: d::MOLD_HEIGHT,
            tundish_width: d::TUNDISH_WIDTH,
            tundish_depth: d::TUNDISH_DEPTH,
            tundish_height: d::TUNDISH_HEIGHT,
            tundish_gap: d::TUNDISH_GAP,
            spray_zone_count: d::SPRAY_ZONE_COUNT,
            spray_spacing: d::SPRAY_SPACING,
            spray_nozzle_radius: d::SPRAY_NOZZLE_RADIUS,
            spray_nozzle_length: d::SPRAY_NOZZLE_LENGTH,
            spray_ring_gap: d::SPRAY_RING_GAP,
            roller_pair_count: d::ROLLER_PAIR_COUNT,
            roller_pitch_ratio: d::ROLLER_PITCH_RATIO,
            guide_roller_radius: d::GUIDE_ROLLER_RADIUS,
            guide_roller_length: d::GUIDE_ROLLER_LENGTH,
            guide_roller_offset: d::GUIDE_ROLLER_OFFSET,
            guide_roller_clearance: d::GUIDE_ROLLER_CLEARANCE,
            create_peripherals: d::CREATE_PERIPHERALS,
            spray_width: d::SPRAY_WIDTH,
            spray_cooling_peak: d::SPRAY_COOLING_PEAK,
            motion_margin: d::COOLING_MARGIN,
        }
    }
}

/// Horizontal induction heating line: billet, coil series, roller table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InductionParams {
    pub billet_section: f64,
    pub billet_length: f64,
    pub coil_inner_diameter: f64,
    pub coil_outer_diameter: f64,
    pub coil_height: f64,
    pub coil_count: u32,
    pub coil_spacing: f64,
    pub coil_start_offset: f64,
    pub roller_diameter: f64,
    pub roller_width: f64,
    pub roller_count: u32,
    pub roller_spacing: f64,
    pub roller_clearance: f64,
    pub frame_height: f64,
    pub column_diameter: f64,
    pub column_offset_x: f64,
    pub column_offset_y: f64,
    pub create_sensors: bool,
    pub create_pipes: bool,
    pub influence_radius: f64,
    pub boost_peak: f64, // °C
    pub flash_width: f64,
    pub flash_peak: f64, // °C
    pub motion_margin: f64,
}

impl InductionParams {
    pub fn dimensions(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("billet_section", self.billet_section),
            ("billet_length", self.billet_length),
            ("coil_inner_diameter", self.coil_inner_diameter),
            ("coil_outer_diameter", self.coil_outer_diameter),
            ("coil_height", self.coil_height),
            ("coil_spacing", self.coil_spacing),
            ("coil_start_offset", self.coil_start_offset),
            ("roller_diameter", self.roller_diameter),
            ("roller_width", self.roller_width),
            ("roller_spacing", self.roller_spacing),
            ("roller_clearance", self.roller_clearance),
            ("frame_height", self.frame_height),
            ("column_diameter", self.column_diameter),
            ("column_offset_x", self.column_offset_x),
            ("column_offset_y", self.column_offset_y),
            ("influence_radius", self.influence_radius),
            ("flash_width", self.flash_width),
            ("motion_margin", self.motion_margin),
        ]
    }
}

impl Default for InductionParams {
    fn default() -> Self {
        Self {
            billet_section: d::BILLET_SECTION,
            billet_length: d::BILLET_LENGTH,
            coil_inner_diameter: d::COIL_INNER_DIAMETER,
            coil_outer_diameter: d::COIL_OUTER_DIAMETER,
            coil_height: d::COIL_HEIGHT,
            coil_count: d::COIL_COUNT,
            coil_spacing: d::COIL_SPACING,
            coil_start_offset: d::COIL_START_OFFSET,
            roller_diameter: d::ROLLER_DIAMETER,
            roller_width: d::ROLLER_WIDTH,
            roller_count: d::ROLLER_COUNT,
            roller_spacing: d::ROLLER_SPACING,
            roller_clearance: d::ROLLER_CLEARANCE,
            frame_height: d::FRAME_HEIGHT,
            column_diameter: d::COLUMN_DIAMETER,
            column_offset_x: d::COLUMN_OFFSET_X,
            column_offset_y: d::COLUMN_OFFSET_Y,
            create_sensors: d::CREATE_SENSORS,
            create_pipes: d::CREATE_PIPES,
            influence_radius: d::COIL_INFLUENCE_RADIUS,
            boost_peak: d::COIL_BOOST_PEAK,
            flash_width: d::FLASH_WIDTH,
            flash_peak: d::FLASH_PEAK,
            motion_margin: d::HEATING_MARGIN,
        }
    }
}
