//! Figure builders, one module per benchmark family.
//!
//! Builders are pure: they turn aggregated tables into a [`Figure`](crate::chart::Figure)
//! and never touch the filesystem. Series without data are skipped with a warning.

pub mod archiver;
pub mod collatz;
pub mod mergesort;
