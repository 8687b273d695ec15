pub mod layout;
pub mod selection;
pub mod visibility;

pub use layout::reduce_layout;
pub use selection::reduce_selection;
pub use visibility::reduce_visibility;
