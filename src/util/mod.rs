// src/util/mod.rs
pub mod debounce;
pub mod testing;
pub mod text;
