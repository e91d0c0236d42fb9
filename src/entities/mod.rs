//! Read-only entities for the relational movie catalog.

pub mod prelude;

pub mod category;
pub mod film;
pub mod film_actor;
pub mod film_category;
