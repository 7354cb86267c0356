pub mod info;
pub mod util;

pub use info::*;
pub use util::*;
