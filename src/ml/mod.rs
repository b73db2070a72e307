pub mod encoding;
pub mod policy;
pub mod training;

pub use encoding::{ActionSpace, StateEncoder};
pub use policy::{DEFAULT_HIDDEN, DEFAULT_STACK, PolicyNetwork};
pub use training::{
    PolicyBatch, PolicyDataset, PolicySample, PolicyTrainer, TrainingEpochMetrics,
    TrainingLoopConfig,
};
