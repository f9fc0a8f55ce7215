pub mod security_context;
