mod dispatcher;
mod operation;
mod request;

pub use dispatcher::{Dispatcher, OutboundResponse, shape_response};
pub use operation::{ModelRegistry, Operation, OperationFamily};
pub use request::{DecodedBody, InboundRequest};
