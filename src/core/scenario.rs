use serde::{Deserialize, Serialize};

use crate::core::supplier::{Supplier, TransportMode};
use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("severity must be within [0, 1] or [0, 100], got {0}")]
    Severity(f64),
    #[error("recovery rate must be within [0, 1], got {0}")]
    RecoveryRate(f64),
    #[error("duration must be greater than 0 days")]
    Duration,
    #[error("timeframe must be greater than 0 days")]
    Timeframe,
    #[error("region {index}: {reason}")]
    Region { index: usize, reason: String },
}

/// Suppliers found inside a region when it was configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactZone {
    pub supplier_ids: Vec<String>,
    pub severity: f64,
    pub recovery_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionRegion {
    pub center: GeoPoint,
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_zone: Option<ImpactZone>,
}

impl DisruptionRegion {
    pub fn new(lat: f64, lng: f64, radius_km: f64) -> Self {
        Self {
            center: GeoPoint::new(lat, lng),
            radius_km,
            impact_zone: None,
        }
    }

    /// Zero-radius regions contain nothing, even a point at the exact center.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.radius_km > 0.0 && self.center.distance_km(point) <= self.radius_km
    }

    pub fn with_impact_zone(
        mut self,
        suppliers: &[Supplier],
        severity: f64,
        recovery_days: u32,
    ) -> Self {
        let supplier_ids = suppliers
            .iter()
            .filter(|supplier| self.contains(&supplier.location))
            .map(|supplier| supplier.id.clone())
            .collect();
        self.impact_zone = Some(ImpactZone {
            supplier_ids,
            severity,
            recovery_days,
        });
        self
    }
}

/// Raw scenario as it arrives from callers or JSON files. Severity may be a
/// fraction or a percentage here; [`SimulationScenario`] always holds the
/// fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    #[serde(default = "default_disruption_type")]
    pub disruption_type: String,
    pub severity: f64,
    pub duration_days: u32,
    #[serde(default = "default_timeframe_days")]
    pub timeframe_days: u32,
    #[serde(default = "default_recovery_rate")]
    pub recovery_rate: f64,
    #[serde(default)]
    pub transport_modes: Vec<TransportMode>,
    #[serde(default)]
    pub regions: Vec<DisruptionRegion>,
    #[serde(default)]
    pub supplier_ids: Vec<String>,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            disruption_type: default_disruption_type(),
            severity: 0.5,
            duration_days: 30,
            timeframe_days: default_timeframe_days(),
            recovery_rate: default_recovery_rate(),
            transport_modes: Vec::new(),
            regions: Vec::new(),
            supplier_ids: Vec::new(),
        }
    }
}

/// A validated disruption scenario, the engine's only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ScenarioInput")]
pub struct SimulationScenario {
    disruption_type: String,
    severity: f64,
    duration_days: u32,
    timeframe_days: u32,
    recovery_rate: f64,
    transport_modes: Vec<TransportMode>,
    regions: Vec<DisruptionRegion>,
    supplier_ids: Vec<String>,
}

impl SimulationScenario {
    pub fn new(input: ScenarioInput) -> Result<Self, ScenarioError> {
        let severity = normalize_severity(input.severity)?;

        if !(0.0..=1.0).contains(&input.recovery_rate) {
            return Err(ScenarioError::RecoveryRate(input.recovery_rate));
        }
        if input.duration_days == 0 {
            return Err(ScenarioError::Duration);
        }
        if input.timeframe_days == 0 {
            return Err(ScenarioError::Timeframe);
        }
        for (index, region) in input.regions.iter().enumerate() {
            if !region.center.is_finite() {
                return Err(ScenarioError::Region {
                    index,
                    reason: "center coordinates must be finite".to_string(),
                });
            }
            if !region.radius_km.is_finite() || region.radius_km < 0.0 {
                return Err(ScenarioError::Region {
                    index,
                    reason: format!(
                        "radius must be a non-negative number, got {}",
                        region.radius_km
                    ),
                });
            }
        }

        let mut supplier_ids: Vec<String> = Vec::with_capacity(input.supplier_ids.len());
        for id in input.supplier_ids {
            let id = id.trim().to_string();
            if !id.is_empty() && !supplier_ids.contains(&id) {
                supplier_ids.push(id);
            }
        }

        Ok(Self {
            disruption_type: input.disruption_type,
            severity,
            duration_days: input.duration_days,
            timeframe_days: input.timeframe_days,
            recovery_rate: input.recovery_rate,
            transport_modes: input.transport_modes,
            regions: input.regions,
            supplier_ids,
        })
    }

    pub fn disruption_type(&self) -> &str {
        &self.disruption_type
    }

    /// Severity as a fraction in [0, 1].
    pub fn severity(&self) -> f64 {
        self.severity
    }

    /// Severity on the 0-100 scale used by cascade event magnitudes.
    pub fn severity_pct(&self) -> f64 {
        self.severity * 100.0
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn timeframe_days(&self) -> u32 {
        self.timeframe_days
    }

    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    pub fn transport_modes(&self) -> &[TransportMode] {
        &self.transport_modes
    }

    pub fn regions(&self) -> &[DisruptionRegion] {
        &self.regions
    }

    pub fn supplier_ids(&self) -> &[String] {
        &self.supplier_ids
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.supplier_ids.is_empty()
    }

    pub fn mode_allowed(&self, mode: TransportMode) -> bool {
        self.transport_modes.is_empty() || self.transport_modes.contains(&mode)
    }
}

impl TryFrom<ScenarioInput> for SimulationScenario {
    type Error = ScenarioError;

    fn try_from(value: ScenarioInput) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SimulationScenario> for ScenarioInput {
    fn from(value: SimulationScenario) -> Self {
        Self {
            disruption_type: value.disruption_type,
            severity: value.severity,
            duration_days: value.duration_days,
            timeframe_days: value.timeframe_days,
            recovery_rate: value.recovery_rate,
            transport_modes: value.transport_modes,
            regions: value.regions,
            supplier_ids: value.supplier_ids,
        }
    }
}

/// Values up to 1.0 are fractions, values in (1, 100] are percentages.
pub fn normalize_severity(raw: f64) -> Result<f64, ScenarioError> {
    if !raw.is_finite() || raw < 0.0 || raw > 100.0 {
        return Err(ScenarioError::Severity(raw));
    }
    if raw <= 1.0 {
        Ok(raw)
    } else {
        Ok(raw / 100.0)
    }
}

fn default_disruption_type() -> String {
    "natural-disaster".to_string()
}

fn default_timeframe_days() -> u32 {
    90
}

fn default_recovery_rate() -> f64 {
    0.5
}
