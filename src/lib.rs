#[macro_use]
mod macros;

pub mod forth;

pub mod prelude {
    pub use crate::forth::{
        error::ForthError,
        runtime::{ConsoleRuntime, Runtime},
        token::Token,
        vm::{Program, State},
    };
    pub use postcard;
    pub use serde;
}
