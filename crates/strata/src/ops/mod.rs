mod dynamic;
mod slice;
mod transpose;

pub use dynamic::*;
pub use slice::*;
pub use transpose::*;
