//! Renderer for `get_tailored_guidance` (spec §6) — either the guidance
//! subsystem's own Markdown, passed through verbatim, or an error block when
//! the subsystem has nothing for the request.

use super::version_header;
use crate::guidance::GuidanceRequest;

pub fn render(request: &GuidanceRequest, content: Option<&str>) -> String {
    match content {
        Some(md) => md.to_string(),
        None => {
            let mut md = String::from("# \u{274c} Guidance Unavailable\n\n");
            md += &version_header(&request.version);
            md += &format!(
                "No guidance found for task `{}`, step `{}`.\n",
                request.task_type, request.step
            );
            if let Some(component) = &request.component_name {
                md += &format!("**Component:** `{component}`\n");
            }
            if let Some(layer) = &request.layer {
                md += &format!("**Layer:** `{layer}`\n");
            }
            md
        }
    }
}
