pub mod abs;
pub mod enums;
pub mod flags;
pub mod info;
pub mod structs;
