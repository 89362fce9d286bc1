//! Wire framing for outgoing messages.

pub mod line_wrapper;
pub mod packet;
