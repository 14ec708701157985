//! LOD resolution signatures
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Every LOD ends with a single float that says what kind of LOD it is.
//! Small values are visual resolutions, a few ranges carry an index, and
//! the special LODs use large "nice" constants such as `1e13` (Geometry) or
//! `1e15` (Memory).
//!
//! Decoding formats the float as `d.ddde<exp>` and matches that text, so
//! values that drifted in the last few bits of the float still decode.

// Signatures are f32 by format definition
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

/// What a LOD is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LodKind {
    Visual,
    ViewGunner,
    ViewPilot,
    ViewCargo,
    Shadow,
    Edit,
    Geometry,
    GeometryBuoy,
    GeometryPhysx,
    Memory,
    LandContact,
    Roadway,
    Paths,
    Hitpoints,
    ViewGeometry,
    FireGeometry,
    ViewCargoGeometry,
    ViewCargoFireGeometry,
    ViewCommander,
    ViewCommanderGeometry,
    ViewCommanderFireGeometry,
    ViewPilotGeometry,
    ViewPilotFireGeometry,
    ViewGunnerGeometry,
    ViewGunnerFireGeometry,
    Subparts,
    ShadowViewCargo,
    ShadowViewPilot,
    ShadowViewGunner,
    Wreckage,
    Groundlayer,
    Underground,
    Navigation,
    Unknown,
}

// Kinds identified by a single constant.
const FIXED: &[(LodKind, f64)] = &[
    (LodKind::ViewGunner, 1.0e3),
    (LodKind::ViewPilot, 1.1e3),
    (LodKind::Geometry, 1.0e13),
    (LodKind::GeometryBuoy, 2.0e13),
    (LodKind::GeometryPhysx, 4.0e13),
    (LodKind::Memory, 1.0e15),
    (LodKind::LandContact, 2.0e15),
    (LodKind::Roadway, 3.0e15),
    (LodKind::Paths, 4.0e15),
    (LodKind::Hitpoints, 5.0e15),
    (LodKind::ViewGeometry, 6.0e15),
    (LodKind::FireGeometry, 7.0e15),
    (LodKind::ViewCargoFireGeometry, 9.0e15),
    (LodKind::ViewCommander, 1.0e16),
    (LodKind::ViewCommanderGeometry, 1.1e16),
    (LodKind::ViewCommanderFireGeometry, 1.2e16),
    (LodKind::ViewPilotGeometry, 1.3e16),
    (LodKind::ViewPilotFireGeometry, 1.4e16),
    (LodKind::ViewGunnerGeometry, 1.5e16),
    (LodKind::ViewGunnerFireGeometry, 1.6e16),
    (LodKind::Subparts, 1.7e16),
    (LodKind::ShadowViewPilot, 1.9e16),
    (LodKind::ShadowViewGunner, 2.0e16),
    (LodKind::Wreckage, 2.1e16),
    (LodKind::Groundlayer, 2.2e16),
    (LodKind::Underground, 2.3e16),
    (LodKind::Navigation, 2.4e16),
];

// Kinds carrying an index as an offset from a base: (kind, base, step, upper bound).
const RANGES: &[(LodKind, f64, f64, f64)] = &[
    (LodKind::ViewCargo, 1.2e3, 1.0, 1.3e3),
    (LodKind::Shadow, 1.0e4, 1.0, 1.2e4),
    (LodKind::Edit, 2.0e4, 1.0, 3.0e4),
];

const VIEW_CARGO_GEOMETRY_BASE: f64 = 8.0e15;
const VIEW_CARGO_GEOMETRY_STEP: f64 = 1.0e13;
const SHADOW_VIEW_CARGO_BASE: f64 = 1.8e16;
const SHADOW_VIEW_CARGO_STEP: f64 = 1.0e13;

impl LodKind {
    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            LodKind::Visual => "Visual",
            LodKind::ViewGunner => "View Gunner",
            LodKind::ViewPilot => "View Pilot",
            LodKind::ViewCargo => "View Cargo",
            LodKind::Shadow => "Shadow Volume",
            LodKind::Edit => "Edit",
            LodKind::Geometry => "Geometry",
            LodKind::GeometryBuoy => "Geometry Buoyancy",
            LodKind::GeometryPhysx => "Geometry PhysX",
            LodKind::Memory => "Memory",
            LodKind::LandContact => "Land Contact",
            LodKind::Roadway => "Roadway",
            LodKind::Paths => "Paths",
            LodKind::Hitpoints => "Hit-points",
            LodKind::ViewGeometry => "View Geometry",
            LodKind::FireGeometry => "Fire Geometry",
            LodKind::ViewCargoGeometry => "View Cargo Geometry",
            LodKind::ViewCargoFireGeometry => "View Cargo Fire Geometry",
            LodKind::ViewCommander => "View Commander",
            LodKind::ViewCommanderGeometry => "View Commander Geometry",
            LodKind::ViewCommanderFireGeometry => "View Commander Fire Geometry",
            LodKind::ViewPilotGeometry => "View Pilot Geometry",
            LodKind::ViewPilotFireGeometry => "View Pilot Fire Geometry",
            LodKind::ViewGunnerGeometry => "View Gunner Geometry",
            LodKind::ViewGunnerFireGeometry => "View Gunner Fire Geometry",
            LodKind::Subparts => "Sub Parts",
            LodKind::ShadowViewCargo => "Shadow Volume - View Cargo",
            LodKind::ShadowViewPilot => "Shadow Volume - View Pilot",
            LodKind::ShadowViewGunner => "Shadow Volume - View Gunner",
            LodKind::Wreckage => "Wreckage",
            LodKind::Groundlayer => "Groundlayer",
            LodKind::Underground => "Underground",
            LodKind::Navigation => "Navigation",
            LodKind::Unknown => "Unknown",
        }
    }

    /// Whether the kind carries a meaningful resolution or index.
    pub fn has_value(self) -> bool {
        matches!(
            self,
            LodKind::Visual
                | LodKind::ViewCargo
                | LodKind::Shadow
                | LodKind::Edit
                | LodKind::ViewCargoGeometry
                | LodKind::ShadowViewCargo
                | LodKind::Unknown
        )
    }

    /// Every kind that has a signature, `Unknown` excluded.
    pub fn all() -> impl Iterator<Item = LodKind> {
        [
            LodKind::Visual,
            LodKind::ViewCargo,
            LodKind::Shadow,
            LodKind::Edit,
            LodKind::ViewCargoGeometry,
            LodKind::ShadowViewCargo,
        ]
        .into_iter()
        .chain(FIXED.iter().map(|&(kind, _)| kind))
    }
}

/// Decoded LOD resolution signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodResolution {
    pub kind: LodKind,
    /// Resolution (Visual) or index (ranged kinds); zero otherwise.
    pub value: i64,
    /// Original signature, kept when re-encoding `kind`/`value` would not
    /// reproduce it bit for bit.
    pub source: Option<f32>,
}

impl LodResolution {
    pub fn new(kind: LodKind, value: i64) -> Self {
        Self {
            kind,
            value,
            source: None,
        }
    }

    /// Decode a signature float.
    pub fn decode(signature: f32) -> Self {
        let derived = derive(signature);
        let exact = derived.kind != LodKind::Unknown
            && derived.encode().to_bits() == signature.to_bits();
        if exact {
            derived
        } else {
            Self {
                source: Some(signature),
                ..derived
            }
        }
    }

    /// Encode back to a signature float.
    ///
    /// A retained `source` wins, so already unusual signatures survive a
    /// read/write cycle unchanged.
    pub fn encode(&self) -> f32 {
        if let Some(source) = self.source {
            return source;
        }
        let value = self.value as f64;
        let signature = match self.kind {
            LodKind::Visual | LodKind::Unknown => value,
            LodKind::ViewCargoGeometry => VIEW_CARGO_GEOMETRY_BASE + value * VIEW_CARGO_GEOMETRY_STEP,
            LodKind::ShadowViewCargo => SHADOW_VIEW_CARGO_BASE + value * SHADOW_VIEW_CARGO_STEP,
            kind => {
                if let Some(&(_, base, step, _)) = RANGES.iter().find(|r| r.0 == kind) {
                    base + value * step
                } else {
                    FIXED
                        .iter()
                        .find(|f| f.0 == kind)
                        .map_or(0.0, |&(_, constant)| constant)
                }
            }
        };
        signature as f32
    }
}

impl Default for LodResolution {
    fn default() -> Self {
        Self::new(LodKind::Visual, 0)
    }
}

impl fmt::Display for LodResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.has_value() {
            write!(f, "{} {}", self.kind.name(), self.value)
        } else {
            f.write_str(self.kind.name())
        }
    }
}

fn scientific(value: f64) -> (String, i32) {
    let text = format!("{value:.3e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn mantissa_digits(mantissa: &str, start: usize) -> Option<i64> {
    mantissa.get(start..start + 2)?.parse().ok()
}

fn derive(signature: f32) -> LodResolution {
    let x = f64::from(signature);
    if !x.is_finite() || x < 0.0 {
        return LodResolution::new(LodKind::Unknown, round(x));
    }
    if x < 1.0e3 {
        return LodResolution::new(LodKind::Visual, round(x));
    }

    let (mantissa, exponent) = scientific(x);
    for &(kind, constant) in FIXED {
        if scientific(constant) == (mantissa.clone(), exponent) {
            return LodResolution::new(kind, 0);
        }
    }
    for &(kind, base, step, upper) in RANGES {
        if (base..upper).contains(&x) {
            return LodResolution::new(kind, round((x - base) / step));
        }
    }

    // Any other e+15 or e+16 signature is an indexed cargo LOD, whatever its leading digits.
    let digits = match exponent {
        15 => mantissa_digits(&mantissa, 2).map(|v| (LodKind::ViewCargoGeometry, v)),
        16 => mantissa_digits(&mantissa, 3).map(|v| (LodKind::ShadowViewCargo, v)),
        _ => None,
    };
    match digits {
        Some((kind, value)) => LodResolution::new(kind, value),
        None => LodResolution::new(LodKind::Unknown, round(x)),
    }
}

fn round(x: f64) -> i64 {
    if x.is_finite() { x.round() as i64 } else { 0 }
}
