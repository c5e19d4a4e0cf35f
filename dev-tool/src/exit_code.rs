/// The command succeeded.
pub const NO_ERROR: i32 = 0;
/// The command ran, but had nothing or only part of its work to do.
pub const NON_FATAL_ERROR: i32 = 1;
/// The command failed.
pub const FATAL_ERROR: i32 = 2;
