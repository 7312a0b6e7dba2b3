use thiserror::Error;

use wb_core::CoreError;
use wb_squad::SquadError;
use wb_world::WorldError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("squad error: {0}")]
    Squad(#[from] SquadError),
}

pub type SimResult<T> = Result<T, SimError>;
