//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod display;
pub mod object_store;

pub use display::ImageDisplay;
pub use object_store::ObjectStore;
