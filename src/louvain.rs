//! Multilevel driver: local moves, coarsening, repeat.

use crate::coarsen::Coarsener;
use crate::config::LouvainConfig;
use crate::error::{Error, Result};
use crate::matrix::ModularityMatrix;
use crate::partition::Partition;
use crate::rng::{seed_for_trial, time_seed};
use crate::session::Session;
use log::{debug, trace};
use rayon::prelude::*;

const MIN_QUALITY_IMPROVEMENT: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct LouvainResult {
    /// Tidy 0-based group of every original node.
    pub assignment: Vec<u32>,
    pub group_count: usize,
    /// Unnormalised quality, see [`ModularityMatrix::quality`].
    pub quality: f64,
    pub levels: u32,
    pub trial: u32,
}

/// Repeats passes over a random node order until a pass moves nothing.
/// Returns the number of passes and the summed gain.
fn local_moves(
    session: &mut Session,
    matrix: &ModularityMatrix,
    cfg: &LouvainConfig,
    order: &mut Vec<u32>,
) -> Result<(usize, f64)> {
    order.resize(matrix.node_count(), 0);
    let mut total_gain = 0.0;

    for pass in 0..cfg.max_passes {
        session.rng_mut().randomized_index_vector(order);

        let mut moved = 0u32;
        let mut pass_gain = 0.0;
        for &node in order.iter() {
            let gain = session.move_node(cfg.strategy, node as usize, &matrix.column(node as usize))?;
            if gain > 0.0 {
                moved += 1;
                pass_gain += gain;
            }
        }
        trace!("pass {} moved {} nodes, gain {}", pass, moved, pass_gain);

        total_gain += pass_gain;
        if moved == 0 {
            return Ok((pass + 1, total_gain));
        }
    }

    Ok((cfg.max_passes, total_gain))
}

fn single_trial(
    matrix: &ModularityMatrix,
    cfg: &LouvainConfig,
    seed: u64,
    trial: u32,
) -> Result<LouvainResult> {
    let mut session = Session::with_seed(seed);
    let mut coarsener = Coarsener::new();
    let mut order = Vec::new();

    // Original node -> node of the current level.
    let mut assignment: Vec<u32> = (0..matrix.node_count() as u32).collect();
    let mut coarse: Option<ModularityMatrix> = None;
    let mut levels = 0u32;

    loop {
        let current = coarse.as_ref().unwrap_or(matrix);
        let size = current.node_count();

        let singletons: Vec<u64> = (1..=size as u64).collect();
        session.assign(&singletons)?;
        let (passes, gain) = local_moves(&mut session, current, cfg, &mut order)?;

        let tidy = session.tidy()?;
        let group_count = session.partition()?.nonempty_group_count();
        for a in assignment.iter_mut() {
            *a = tidy[*a as usize];
        }
        levels += 1;
        debug!(
            "trial {} level {}: {} nodes -> {} groups in {} passes, gain {}",
            trial, levels, size, group_count, passes, gain
        );

        if group_count == size || levels as usize >= cfg.max_levels {
            break;
        }

        let labels: Vec<u64> = tidy.iter().map(|&g| g as u64 + 1).collect();
        let level_partition = Partition::from_labels(&labels)?;
        let next = current.coarsen(&level_partition, &mut coarsener)?;
        coarse = Some(next);
    }

    let labels: Vec<u64> = assignment.iter().map(|&g| g as u64 + 1).collect();
    // Relabelling by first appearance makes the composed assignment tidy.
    let partition = Partition::from_labels(&labels)?;
    let quality = matrix.quality(&partition)?;

    Ok(LouvainResult {
        group_count: partition.nonempty_group_count(),
        assignment: partition.assignment().to_vec(),
        quality,
        levels,
        trial,
    })
}

#[inline]
fn resolve_trial_threads(trials: u32, requested_threads: Option<usize>) -> usize {
    let default_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    requested_threads
        .filter(|&t| t > 0)
        .unwrap_or(default_threads)
        .min(trials as usize)
        .max(1)
}

/// Runs `cfg.num_trials` independent optimisations and keeps the best.
///
/// Trials run in parallel, each with its own session and a seed derived from
/// the base seed, so the result depends only on the seed and trial count.
pub fn run(matrix: &ModularityMatrix, cfg: &LouvainConfig) -> Result<LouvainResult> {
    let trials = cfg.num_trials.max(1);
    let base_seed = cfg.seed.unwrap_or_else(time_seed);

    if trials == 1 {
        return single_trial(matrix, cfg, base_seed, 0);
    }

    let worker_threads = resolve_trial_threads(trials, cfg.trial_threads);
    let mut results: Vec<LouvainResult> = if worker_threads == 1 {
        (0..trials)
            .map(|t| single_trial(matrix, cfg, seed_for_trial(base_seed, t), t))
            .collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        debug!(
            "running {} trials on {} threads",
            trials,
            pool.current_num_threads()
        );
        pool.install(|| {
            (0..trials)
                .into_par_iter()
                .map(|t| single_trial(matrix, cfg, seed_for_trial(base_seed, t), t))
                .collect::<Result<Vec<_>>>()
        })?
    };

    // Deterministic best-trial selection independent of worker scheduling.
    results.sort_unstable_by_key(|r| r.trial);

    let mut iter = results.into_iter();
    let mut best = iter.next().ok_or(Error::ThreadPool("no trial results".to_string()))?;
    for result in iter {
        if result.quality > best.quality + MIN_QUALITY_IMPROVEMENT {
            best = result;
        }
    }
    debug!("best trial {} with quality {}", best.trial, best.quality);

    Ok(best)
}
