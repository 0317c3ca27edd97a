use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EstimateError;

/// Cities where an exam can be administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum City {
    Bogota,
    Medellin,
    Cali,
    Barranquilla,
    Bucaramanga,
    Quibdo,
    SanAndres,
}

impl City {
    pub const ALL: [City; 7] = [
        City::Bogota,
        City::Medellin,
        City::Cali,
        City::Barranquilla,
        City::Bucaramanga,
        City::Quibdo,
        City::SanAndres,
    ];

    /// Capital city; transport there is priced at the base rate.
    pub const CAPITAL: City = City::Bogota;

    pub fn name(&self) -> &'static str {
        match self {
            City::Bogota => "Bogotá",
            City::Medellin => "Medellín",
            City::Cali => "Cali",
            City::Barranquilla => "Barranquilla",
            City::Bucaramanga => "Bucaramanga",
            City::Quibdo => "Quibdó",
            City::SanAndres => "San Andrés",
        }
    }

    pub fn is_capital(&self) -> bool {
        *self == Self::CAPITAL
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        City::ALL
            .into_iter()
            .find(|city| normalize(city.name()) == key)
            .ok_or_else(|| EstimateError::invalid(format!("Unsupported city: '{}'", s.trim())))
    }
}

impl TryFrom<String> for City {
    type Error = EstimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<City> for String {
    fn from(city: City) -> Self {
        city.name().to_string()
    }
}

/// How the exam is delivered. Virtual exams need more room chiefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Modality {
    Written,
    Virtual,
}

impl Modality {
    pub const ALL: [Modality; 2] = [Modality::Written, Modality::Virtual];

    pub fn name(&self) -> &'static str {
        match self {
            Modality::Written => "Escrita",
            Modality::Virtual => "Virtual",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Modality {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "escrita" | "written" => Ok(Modality::Written),
            "virtual" => Ok(Modality::Virtual),
            _ => Err(EstimateError::invalid(format!(
                "Unsupported modality: '{}'. Must be 'escrita' or 'virtual'",
                s.trim()
            ))),
        }
    }
}

impl TryFrom<String> for Modality {
    type Error = EstimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Modality> for String {
    fn from(modality: Modality) -> Self {
        modality.name().to_string()
    }
}

/// Lowercase, fold Spanish accents and treat `-`/`_` as spaces so that
/// `san-andres`, `San Andrés` and `SAN_ANDRES` all compare equal.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
