//! Call bounded context - ring-only private calls

pub mod request;
pub mod transport;
pub mod value_object;

pub use request::{CallRequest, UserIdField};
pub use transport::CallTransport;
pub use value_object::{ContextMode, StartCallParams, StartCallResult};
