mod conv;
mod pad;

pub use conv::*;
pub use pad::*;
