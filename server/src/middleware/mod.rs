pub mod login_check;
pub mod request_log;

pub use login_check::{login_member, LoginCheckGate, LoginMember};
pub use request_log::{LogGate, LogId};
