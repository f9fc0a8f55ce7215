/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::security::SecurityContextFilter;

#[derive(Clone)]
pub struct AppState {
    pub security: Arc<SecurityContextFilter>,
}

impl AppState {
    pub fn new(security: Arc<SecurityContextFilter>) -> Self {
        Self { security }
    }
}
