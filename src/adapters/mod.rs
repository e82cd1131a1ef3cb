// Adapters layer: concrete implementations for external systems (http, local oracle, storage).

pub mod http;
pub mod oracle;
pub mod storage;
