pub mod config;
pub mod error;
pub mod factory;
pub mod parser;
pub mod providers;
pub mod types;

pub use config::{
    HttpMitigationConfig, MitigationConfig, MitigationProviderId, OpenAiCompatMitigationConfig,
};
pub use error::MitigationError;
pub use factory::create_service;
pub use providers::{HttpMitigationService, OpenAiCompatMitigationService};
pub use types::{MitigationRequest, MitigationService, SimulationConfig};
