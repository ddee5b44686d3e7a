mod calls;
mod jid;
mod models;
mod protocol;

pub use calls::*;
pub use jid::*;
pub use models::*;
pub use protocol::*;
