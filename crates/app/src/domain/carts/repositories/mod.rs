//! Cart Repositories

mod carts;
mod fees;

pub(crate) use carts::PgCartsRepository;
pub(crate) use fees::PgCartFeesRepository;
