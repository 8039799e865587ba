mod http;
mod openai_compat;

pub use http::HttpMitigationService;
pub use openai_compat::OpenAiCompatMitigationService;
