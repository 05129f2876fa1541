//! Cart Fee Handlers

pub(crate) mod create;
