mod annotate;
mod site;

pub use annotate::*;
pub use site::*;
