// Adapters layer: concrete implementations of the domain ports
// (HTTP transport for the listing site, local file storage).

pub mod http;
pub mod storage;

pub use http::ReqwestTransport;
pub use storage::LocalStorage;
