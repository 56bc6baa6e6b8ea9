//! Binding fidelity tests: struct layouts and the entry point table.

mod layout;
