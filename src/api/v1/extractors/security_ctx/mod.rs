/*!
 * Security context extractors
 *
 * Responsibility:
 * - hand the SecurityContext built by the security middleware to handlers
 * - keep axum specifics here; the context type itself lives in `crate::security`
 *
 * Public API:
 * - SecurityCtx    (any caller, anonymous included)
 * - Authenticated  (401 challenge for anonymous callers)
 */

mod core;

pub use core::{Authenticated, SecurityCtx};
