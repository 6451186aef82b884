//! Live adapters talking to real systems.

pub mod display;
pub mod supabase;
