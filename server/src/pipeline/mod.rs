//! The request pipeline: gates, routing, exception resolution and the
//! internal error dispatch, hosted behind a single actix service.

pub mod boundary;
pub mod dispatcher;
pub mod gate;
pub mod multipart;
pub mod pattern;
pub mod request;
pub mod response;
pub mod router;

pub use dispatcher::Dispatcher;
pub use gate::{Gate, GateChain, GateDecision, GateRegistration};
pub use request::{DispatchKind, WebRequest};
pub use response::{PendingView, SentError, WebResponse};
pub use router::{Handler, RouteMatch, RouteTable};
