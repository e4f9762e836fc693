pub mod eval;
pub mod ordering;
pub mod pst;
#[allow(clippy::module_inception)]
pub mod search;
pub mod tt;
