//! Session descriptor and shared runtime state

mod descriptor;
mod state;

pub use descriptor::{Session, ShardConfig};
pub use state::{ConnectionState, SessionState};
