//! Bookshelf application library
//!
//! Hosts the application modules mounted by the bookshelf server.

pub mod modules;

pub use modules::register_all;
