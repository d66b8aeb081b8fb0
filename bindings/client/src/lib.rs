mod error;
mod http_transport;

pub mod prelude {
    pub use crate::http_transport::HttpTransport;
}
