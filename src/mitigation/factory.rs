use std::sync::Arc;

use crate::mitigation::config::{MitigationConfig, MitigationProviderId};
use crate::mitigation::error::MitigationError;
use crate::mitigation::providers::{HttpMitigationService, OpenAiCompatMitigationService};
use crate::mitigation::types::MitigationService;

/// `Ok(None)` when no provider is selected.
pub fn create_service(
    config: &MitigationConfig,
) -> Result<Option<Arc<dyn MitigationService>>, MitigationError> {
    config.validate_selected_provider()?;

    let service: Arc<dyn MitigationService> = match config.provider {
        MitigationProviderId::None => return Ok(None),
        MitigationProviderId::Http => Arc::new(HttpMitigationService::new(config.http.clone())?),
        MitigationProviderId::OpenaiCompat => Arc::new(OpenAiCompatMitigationService::new(
            config.openai_compat.clone(),
            config.effective_api_key(),
        )?),
    };

    tracing::info!("mitigation provider: {}", service.id());
    Ok(Some(service))
}
