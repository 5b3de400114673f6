pub mod check;
pub mod scan;
pub mod trim;
pub mod util;

pub use check::*;
pub use scan::*;
pub use trim::*;
pub use util::*;
