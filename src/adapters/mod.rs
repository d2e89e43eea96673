pub mod jsr;
pub mod npm;
