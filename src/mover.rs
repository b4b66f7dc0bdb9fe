use crate::column::ColumnAccess;
use crate::delta::{DeltaEngine, IMPROVEMENT_TOLERANCE};
use crate::error::{Error, Result};
use crate::partition::Partition;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// How a destination group is chosen among the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveStrategy {
    /// Largest improving delta; ties go to the earliest candidate.
    #[default]
    MaxGain,
    /// Uniformly at random among improving candidates.
    UniformImproving,
    /// At random among improving candidates, proportional to their delta.
    WeightedImproving,
}

/// Applies a [`MoveStrategy`] to single nodes of a [`Partition`].
///
/// Holds the delta engine and the improving-move buffers so repeated moves do
/// not reallocate.
#[derive(Debug, Clone, Default)]
pub struct Mover {
    engine: DeltaEngine,
    improving_groups: Vec<u32>,
    improving_gains: Vec<f64>,
}

impl Mover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `node` according to `strategy` and returns the modularity gain,
    /// `0.0` when the node stays.
    pub fn apply<C, R>(
        &mut self,
        strategy: MoveStrategy,
        partition: &mut Partition,
        node: usize,
        column: &C,
        rng: &mut R,
    ) -> Result<f64>
    where
        C: ColumnAccess + ?Sized,
        R: Rng,
    {
        let Mover {
            engine,
            improving_groups,
            improving_gains,
        } = self;

        let deltas = engine.compute(partition, node, column)?;

        let choice = match strategy {
            MoveStrategy::MaxGain => {
                let mut best_group = deltas.current_group();
                let mut best_gain = 0.0f64;
                for (group, delta) in deltas.iter() {
                    if delta > best_gain {
                        best_group = group;
                        best_gain = delta;
                    }
                }
                (best_gain > IMPROVEMENT_TOLERANCE).then_some((best_group, best_gain))
            }
            MoveStrategy::UniformImproving | MoveStrategy::WeightedImproving => {
                improving_groups.clear();
                improving_gains.clear();
                for (group, delta) in deltas.improving() {
                    improving_groups.push(group);
                    improving_gains.push(delta);
                }

                if improving_groups.is_empty() {
                    None
                } else {
                    let pick = if strategy == MoveStrategy::UniformImproving {
                        rng.gen_range(0..improving_groups.len())
                    } else {
                        WeightedIndex::new(improving_gains.iter())
                            .map_err(|_| Error::InvalidWeights)?
                            .sample(rng)
                    };
                    Some((improving_groups[pick], improving_gains[pick]))
                }
            }
        };

        match choice {
            Some((group, gain)) => {
                partition.move_node(node, group)?;
                Ok(gain)
            }
            None => Ok(0.0),
        }
    }
}
