pub mod http;
pub mod local;

pub use http::HttpProvider;
pub use local::LocalProvider;
