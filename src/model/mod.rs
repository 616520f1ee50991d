//! Pure data structures: the catalog, the order form, and order DTOs.

pub mod catalog;
pub mod form;
pub mod order;

pub use catalog::*;
pub use form::*;
pub use order::*;
