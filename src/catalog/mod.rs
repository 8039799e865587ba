//! Reference data the engine queries: suppliers, transport routes and
//! downstream projects. Loaded once and shared read-only across runs.

mod builtin;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{InfrastructureProject, Supplier, TransportRoute};

pub use builtin::builtin_catalog;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub routes: Vec<TransportRoute>,
    #[serde(default)]
    pub projects: Vec<InfrastructureProject>,
}

impl ReferenceData {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let data: ReferenceData = serde_json::from_str(raw)?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data = Self::from_json_str(&raw)?;
        tracing::debug!(
            "loaded catalog {}: {} suppliers, {} routes, {} projects",
            path.display(),
            data.suppliers.len(),
            data.routes.len(),
            data.projects.len()
        );
        Ok(data)
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == id)
    }

    pub fn route(&self, id: &str) -> Option<&TransportRoute> {
        self.routes.iter().find(|route| route.id == id)
    }

    /// Reject records the engine's formulas cannot handle.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();

        for supplier in &self.suppliers {
            if !seen.insert(supplier.id.as_str()) {
                return Err(CatalogError::DuplicateId(supplier.id.clone()));
            }
            if !(1..=3).contains(&supplier.tier) {
                return Err(invalid(
                    &supplier.id,
                    format!("tier must be 1-3, got {}", supplier.tier),
                ));
            }
            check_risk(&supplier.id, supplier.risk_score)?;
            if !supplier.location.is_finite() {
                return Err(invalid(&supplier.id, "location must be finite"));
            }
        }

        for route in &self.routes {
            if !seen.insert(route.id.as_str()) {
                return Err(CatalogError::DuplicateId(route.id.clone()));
            }
            check_risk(&route.id, route.risk_score)?;
            if route.endpoints().iter().any(|point| !point.is_finite()) {
                return Err(invalid(&route.id, "endpoint coordinates must be finite"));
            }
        }

        for project in &self.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::DuplicateId(project.id.clone()));
            }
        }

        Ok(())
    }
}

fn check_risk(id: &str, risk: f64) -> Result<(), CatalogError> {
    if !(0.0..=100.0).contains(&risk) {
        return Err(invalid(id, format!("risk score must be 0-100, got {risk}")));
    }
    Ok(())
}

fn invalid(id: &str, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidRecord {
        id: id.to_string(),
        reason: reason.into(),
    }
}
