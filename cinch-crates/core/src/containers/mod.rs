//! Collections used throughout the engine.
//!
//! Hashed collections use the fnv hasher so iteration order, and with it every search which
//! depends on it, is the same from run to run.
mod keyed_vec;

use fnv::FnvBuildHasher;
pub use keyed_vec::*;

pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
pub type HashSet<K, Hasher = FnvBuildHasher> = std::collections::HashSet<K, Hasher>;
