//! Cart Fees

mod handlers;

pub(crate) use handlers::*;
