use crate::mover::MoveStrategy;

#[derive(Debug, Clone)]
pub struct LouvainConfig {
    pub strategy: MoveStrategy,
    /// Base seed; `None` seeds once from the clock.
    pub seed: Option<u64>,
    pub num_trials: u32,
    pub trial_threads: Option<usize>,
    /// Local-move passes allowed per level.
    pub max_passes: usize,
    pub max_levels: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            strategy: MoveStrategy::MaxGain,
            seed: None,
            num_trials: 1,
            trial_threads: None,
            max_passes: 1000,
            max_levels: 64,
        }
    }
}
