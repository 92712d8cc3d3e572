pub mod asset;
pub mod price;
pub mod selection;
pub mod view;

pub use asset::*;
pub use price::*;
pub use selection::*;
pub use view::*;
