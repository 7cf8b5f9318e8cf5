pub mod file_source;
pub mod http_client;

pub use file_source::FileSource;
pub use http_client::ReqwestSource;
