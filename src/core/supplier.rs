use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierStatus {
    #[serde(rename = "Critical")]
    Critical,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "On Track")]
    OnTrack,
}

impl std::fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "Critical",
            Self::AtRisk => "At Risk",
            Self::OnTrack => "On Track",
        };
        f.write_str(s)
    }
}

/// Three-step qualitative scale shared by supplier impact classes and
/// mitigation strategy impact/difficulty ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    #[default]
    Medium,
    Low,
}

impl Level {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Lenient parse: anything mentioning "high" or "low" maps there,
    /// everything else is medium.
    pub fn from_loose(value: &str) -> Self {
        let lowered = value.trim().to_ascii_lowercase();
        if lowered.contains("high") || lowered.contains("critical") {
            Self::High
        } else if lowered.contains("low") || lowered.contains("minor") {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// 1 = direct supplier, 3 = most indirect.
    pub tier: u8,
    pub location: GeoPoint,
    pub country: String,
    #[serde(default)]
    pub materials: Vec<String>,
    pub risk_score: f64,
    pub status: SupplierStatus,
    pub impact: Level,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Sea,
    Air,
    Rail,
    Road,
}

impl TransportMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sea => "sea",
            Self::Air => "air",
            Self::Rail => "rail",
            Self::Road => "road",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sea" | "ocean" => Ok(Self::Sea),
            "air" => Ok(Self::Air),
            "rail" => Ok(Self::Rail),
            "road" | "truck" => Ok(Self::Road),
            _ => Err(format!("unsupported transport mode: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Operational,
    Delayed,
    Disrupted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEndpoint {
    pub name: String,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRoute {
    pub id: String,
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub mode: TransportMode,
    pub risk_score: f64,
    pub status: RouteStatus,
    #[serde(default)]
    pub materials: Vec<String>,
}

impl TransportRoute {
    pub fn endpoints(&self) -> [&GeoPoint; 2] {
        [&self.origin.location, &self.destination.location]
    }
}

/// Downstream infrastructure project that consumes supplied materials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureProject {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub country: String,
    #[serde(default)]
    pub required_materials: Vec<String>,
    #[serde(default)]
    pub budget: f64,
}
