//! A virtual pet: five meters that decay, care that levels it up, neglect
//! that ends the game, and a small coin economy on the side.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod sim;
pub mod storage;

pub use engine::GameEngine;
pub use error::{ActionError, LoadError, StoreError};
pub use model::{Band, ItemType, Meter, PetState, Rules, SaveRecord, ShopItem, StatusMessage, SHOP};
pub use sim::{BattleOutcome, PlayerAction};
pub use storage::{BlobStore, FileStore, MemoryStore, PersistenceManager};
