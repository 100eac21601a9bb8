//! External guidance-subsystem contract (spec §6, consumer side).
//!
//! The guidance subsystem itself — a templated authoring-advice renderer
//! keyed by .NET Framework/.NET major version that reads Markdown templates
//! and code snippets off disk — is explicitly out of scope (spec Non-goals):
//! only its existence and the inputs it consumes are specified here. What
//! this module owns is the seam: a trait the `get_tailored_guidance` tool
//! handler calls through, and a graceful "missing" path when no provider is
//! wired in.

use async_trait::async_trait;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GuidanceRequest {
    pub task_type: String,
    pub component_name: Option<String>,
    pub layer: Option<String>,
    /// `"overview"` or a 1-based step number rendered as a string — the
    /// subsystem's own step-numbering scheme, passed through untouched.
    pub step: String,
    pub version: String,
}

/// Given `(taskType, componentName?, layer?, step, version)`, returns a
/// Markdown string, or `None` if the subsystem has nothing for that
/// combination. Implemented out-of-crate; `NullGuidanceProvider` is the
/// default wiring when no provider is configured.
#[async_trait]
pub trait GuidanceProvider: Send + Sync {
    async fn guidance(&self, request: &GuidanceRequest) -> Option<String>;
}

/// Default provider: the guidance subsystem is not configured. Per spec
/// §6, this must not affect the rest of the system — the tool handler
/// renders a single error block and every other tool keeps working.
pub struct NullGuidanceProvider;

#[async_trait]
impl GuidanceProvider for NullGuidanceProvider {
    async fn guidance(&self, _request: &GuidanceRequest) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_provider_always_reports_missing() {
        let provider = NullGuidanceProvider;
        let request = GuidanceRequest {
            task_type: "extend_business_component".to_string(),
            component_name: Some("AccountAgent".to_string()),
            layer: None,
            step: "overview".to_string(),
            version: "7.10.2".to_string(),
        };
        assert!(provider.guidance(&request).await.is_none());
    }
}
