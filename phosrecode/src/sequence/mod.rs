mod cleavage;
mod digest;
mod peptide;
mod protease;

pub use cleavage::*;
pub use digest::*;
pub use peptide::*;
pub use protease::*;
