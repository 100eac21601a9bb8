//! Markdown error blocks (spec §4.6 step 3, §7) — raw stack traces never
//! reach a client; every error surfaces as a `kind` tag and a short message.

use crate::error::EngineError;

pub fn render(err: &EngineError) -> String {
    match err {
        EngineError::VersionUnavailable { requested, available } => {
            let mut md = format!("# \u{274c} Version Unavailable\n\n");
            md += &format!("Version `{requested}` has no indexed graph.\n\n");
            if available.is_empty() {
                md += "**Available versions:** none\n";
            } else {
                md += "**Available versions:**\n\n";
                for v in available {
                    md += &format!("- `{v}`\n");
                }
            }
            md
        }
        EngineError::NodeNotFound(id) => {
            format!("# \u{274c} Not Found\n\nNo node matches `{id}` in this version.\n")
        }
        EngineError::InvalidArgument(msg) => {
            format!("# \u{274c} Invalid Argument\n\n{msg}\n")
        }
        EngineError::StoreUnavailable(_) => {
            "# \u{274c} Store Unavailable\n\nThe graph store could not be reached. Try again shortly.\n"
                .to_string()
        }
        EngineError::Timeout(d) => {
            format!("# \u{23f1}\u{fe0f} Timeout\n\nThe operation exceeded its {d:?} budget.\n")
        }
        EngineError::Internal(_) => {
            "# \u{274c} Internal Error\n\nAn unexpected error occurred; it has been logged.\n"
                .to_string()
        }
    }
}
