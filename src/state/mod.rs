mod bet_store;

pub use bet_store::{BetStore, IndexKind, StoreMetadata};
