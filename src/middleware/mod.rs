/*
 * Responsibility
 * - middleware entry points
 */
pub mod auth;
pub mod cors;
pub mod http;
