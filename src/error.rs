use thiserror::Error;

/// Reasons an action intent was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough coins: have {coins}, need {cost}")]
    InsufficientFunds { coins: u64, cost: u64 },

    #[error("the pet is gone; restart to play again")]
    GameOver,
}

/// Blob store read/write failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a saved pet could not be restored.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no save found under key '{0}'")]
    Missing(String),

    #[error("save is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
