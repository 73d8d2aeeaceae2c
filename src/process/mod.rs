/*!
 * Process Management
 * Process records and the registry that owns them
 */

mod registry;
mod types;

pub use registry::ProcessRegistry;
pub use types::{ProcessInfo, ProcessResult, DELETED_NAME, PRIORITY_SENTINEL};
