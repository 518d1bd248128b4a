//! GTK user interface

pub mod window;
