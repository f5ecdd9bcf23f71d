//! Pickup locations
//!
//! The fixed set of physical spots where vendors hand food over. Menus may
//! only be published against one of these.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Campus pickup location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    UniversidadPuerta3,
    SanIsidro,
    InstitutoCafeteria,
    CampusSurEdificioA,
    LaMolina,
    Brena,
}

impl Location {
    /// All valid pickup locations
    pub const ALL: [Location; 6] = [
        Location::UniversidadPuerta3,
        Location::SanIsidro,
        Location::InstitutoCafeteria,
        Location::CampusSurEdificioA,
        Location::LaMolina,
        Location::Brena,
    ];

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UniversidadPuerta3 => "Universidad Nacional - Puerta 3",
            Self::SanIsidro => "Centro Empresarial San Isidro",
            Self::InstitutoCafeteria => "Instituto Tecnológico - Cafetería",
            Self::CampusSurEdificioA => "Campus Sur - Edificio A",
            Self::LaMolina => "Parque Empresarial La Molina",
            Self::Brena => "Centro de Negocios Breña",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .iter()
            .find(|l| l.display_name() == s)
            .copied()
            .ok_or_else(|| format!("unknown location: {s}"))
    }
}
