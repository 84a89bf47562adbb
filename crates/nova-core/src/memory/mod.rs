//! User-taught facts and the recall interceptor that answers from them.

pub mod recall;
pub mod store;
