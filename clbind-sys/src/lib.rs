//! OpenCL 1.2 host API declarations.
//!
//! Types, structs, and constants mirror `cl.h` with identical layouts. Entry
//! points are not linked at build time: they are resolved by name from the
//! installed OpenCL library into a [`ClApi`] table (see [`ClApi::load`]).
//! Enable the `linked` feature to also get plain `extern "system"`
//! declarations linked against the system library.
//!
//! Nothing in this crate manages handle lifetimes. Every handle returned by
//! a `clCreate*` function must be released exactly once with its matching
//! `clRelease*` function.

mod cl_h;
mod api;

pub use self::cl_h::*;
pub use self::api::{ClApi, EntryPoint, Requirement, LoadError, LIBRARY_ENV_VAR};

#[cfg(feature = "linked")]
pub use self::api::linked_decls as linked;

#[cfg(test)]
mod tests;
