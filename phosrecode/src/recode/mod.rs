mod combinatorics;
mod recoder;
mod reverse;

pub use combinatorics::*;
pub use recoder::*;
pub use reverse::*;
