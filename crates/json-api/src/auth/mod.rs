//! Administrator authentication

pub(crate) mod middleware;
