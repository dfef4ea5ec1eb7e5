//! Interactive shell for the record vault.

pub mod shell;

pub use shell::{MenuChoice, Shell};
