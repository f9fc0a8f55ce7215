mod security_ctx;

pub use security_ctx::{Authenticated, SecurityCtx};
