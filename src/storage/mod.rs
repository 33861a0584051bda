pub mod index;
pub mod refs;
pub mod state;

pub use index::EntityIndex;
pub use refs::EntitiesRef;
pub use state::StoreState;
