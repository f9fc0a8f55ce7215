/*!
 * Request security: TaskRooAuth header parsing, the per-request SecurityContext and the
 * filter that ties them to the session store.
 */
pub mod context;
pub mod filter;
pub mod header;

pub use context::{Role, SecurityContext};
pub use filter::{AuthError, SecurityContextFilter};
