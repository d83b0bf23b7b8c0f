mod builder;
mod load;

pub use builder::*;
