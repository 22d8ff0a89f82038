pub mod compiler;
pub mod error;
#[cfg(feature = "alloc")]
pub mod image;
pub mod intern;
pub mod ops;
pub mod runtime;
pub mod token;
pub mod vm;

#[cfg(test)]
pub mod util;
