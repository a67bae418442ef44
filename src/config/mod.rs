//! Settings for the store itself: where config files live and how the
//! store watches them.

mod options;
mod paths;

pub use options::StoreOptions;
pub use paths::ConfigPaths;
