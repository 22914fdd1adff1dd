//! Session-level machinery: piece supply, scoring and leveling, the drop
//! scheduler, and the [`GameSession`] orchestrator that ties them to the
//! core grid model.

pub use self::{gravity::*, piece_queue::*, progression::*, session::*};

pub(crate) mod gravity;
pub(crate) mod piece_queue;
pub(crate) mod progression;
pub(crate) mod session;
