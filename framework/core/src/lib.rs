mod error;
mod shutdown;
mod transport;

pub mod prelude {
    pub use crate::error::{ConfigurationError, TransportError};
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
    pub use crate::transport::{ScenarioRequest, Transport, TransportResponse};
}
