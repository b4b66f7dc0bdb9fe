use genlouvain::column::{DenseColumn, OwnedColumn, SparseColumn};
use genlouvain::delta::DeltaEngine;
use genlouvain::error::Error;
use genlouvain::mover::{MoveStrategy, Mover};
use genlouvain::partition::Partition;
use genlouvain::rng::SessionRng;

const STRATEGIES: [MoveStrategy; 3] = [
    MoveStrategy::MaxGain,
    MoveStrategy::UniformImproving,
    MoveStrategy::WeightedImproving,
];

#[test]
fn no_positive_entries_never_moves() {
    let column = [2.0, -1.0, -0.5, 0.0];
    for strategy in STRATEGIES {
        let mut p = Partition::singletons(4);
        let mut mover = Mover::new();
        let mut rng = SessionRng::from_seed(1);
        let gain = mover
            .apply(strategy, &mut p, 0, &DenseColumn::new(&column), &mut rng)
            .unwrap();
        assert_eq!(gain, 0.0);
        assert_eq!(p.assignment(), &[0, 1, 2, 3]);
    }
}

#[test]
fn single_improving_group_is_chosen_by_every_strategy() {
    let column = [0.0, 0.5, -0.2];
    for strategy in STRATEGIES {
        for seed in 0..20 {
            let mut p = Partition::singletons(3);
            let mut mover = Mover::new();
            let mut rng = SessionRng::from_seed(seed);
            let gain = mover
                .apply(strategy, &mut p, 0, &DenseColumn::new(&column), &mut rng)
                .unwrap();
            assert!((gain - 0.5).abs() < 1e-15);
            assert_eq!(p.group_of(0), 1);
        }
    }
}

#[test]
fn own_diagonal_is_excluded_from_staying() {
    // node 0 shares group 0 with node 1; staying is worth (3 + 1) - 3 = 1
    let dense = [3.0, 1.0, 1.5];
    let mut p = Partition::from_labels(&[1, 1, 2]).unwrap();
    let mut engine = DeltaEngine::new();
    let deltas = engine.compute(&p, 0, &DenseColumn::new(&dense)).unwrap();
    assert_eq!(deltas.current_group(), 0);
    assert_eq!(deltas.delta(0), Some(0.0));
    assert!((deltas.delta(1).unwrap() - 0.5).abs() < 1e-15);

    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(3);
    let gain = mover
        .apply(MoveStrategy::MaxGain, &mut p, 0, &DenseColumn::new(&dense), &mut rng)
        .unwrap();
    assert!((gain - 0.5).abs() < 1e-15);
    assert_eq!(p.group_of(0), 1);
}

#[test]
fn dense_and_sparse_columns_give_the_same_deltas() {
    let p = Partition::from_labels(&[1, 1, 2, 2, 3]).unwrap();
    let dense = [1.0, 0.3, 0.4, -0.2, 0.0];
    let rows = [0u32, 1, 2, 3];
    let values = [1.0, 0.3, 0.4, -0.2];
    let sparse = SparseColumn::new(5, &rows, &values).unwrap();

    let mut engine = DeltaEngine::new();
    let from_dense: Vec<(u32, f64)> = engine
        .compute(&p, 0, &DenseColumn::new(&dense))
        .unwrap()
        .iter()
        .collect();
    let from_sparse: Vec<(u32, f64)> = engine.compute(&p, 0, &sparse).unwrap().iter().collect();

    assert_eq!(from_dense.len(), 2);
    assert_eq!(from_sparse.len(), 2);
    for ((gd, dd), (gs, ds)) in from_dense.iter().zip(from_sparse.iter()) {
        assert_eq!(gd, gs);
        assert!((dd - ds).abs() < 1e-12);
    }
    assert_eq!(from_dense[0], (0, 0.0));
    assert_eq!(from_dense[1].0, 1);
    assert!((from_dense[1].1 + 0.1).abs() < 1e-12);
}

#[test]
fn groups_reached_only_through_non_positive_entries_are_not_candidates() {
    let p = Partition::from_labels(&[1, 2, 3, 3]).unwrap();
    let dense = [0.0, 0.7, -0.3, -0.1];
    let mut engine = DeltaEngine::new();
    let deltas = engine.compute(&p, 0, &DenseColumn::new(&dense)).unwrap();
    assert_eq!(deltas.len(), 2);
    assert!(deltas.delta(1).is_some());
    assert_eq!(deltas.delta(2), None);
}

#[test]
fn gains_below_tolerance_are_not_improvements() {
    let column = [0.0, 1e-12];
    for strategy in STRATEGIES {
        let mut p = Partition::singletons(2);
        let mut mover = Mover::new();
        let mut rng = SessionRng::from_seed(9);
        let gain = mover
            .apply(strategy, &mut p, 0, &DenseColumn::new(&column), &mut rng)
            .unwrap();
        assert_eq!(gain, 0.0);
        assert_eq!(p.group_of(0), 0);
    }
}

#[test]
fn max_gain_breaks_ties_by_scan_order() {
    let column = [0.0, 0.5, 0.5];
    let mut p = Partition::singletons(3);
    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(0);
    mover
        .apply(MoveStrategy::MaxGain, &mut p, 0, &DenseColumn::new(&column), &mut rng)
        .unwrap();
    assert_eq!(p.group_of(0), 1);
}

#[test]
fn max_gain_picks_the_largest_improvement() {
    let column = [0.0, 0.2, 0.9, 0.4];
    let mut p = Partition::singletons(4);
    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(0);
    let gain = mover
        .apply(MoveStrategy::MaxGain, &mut p, 0, &DenseColumn::new(&column), &mut rng)
        .unwrap();
    assert_eq!(p.group_of(0), 2);
    assert!((gain - 0.9).abs() < 1e-15);
}

#[test]
fn weighted_selection_follows_gain_proportions() {
    let column = [0.0, 1.0, 3.0];
    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(2024);
    let trials = 10_000;
    let mut heavy = 0usize;

    for _ in 0..trials {
        let mut p = Partition::singletons(3);
        let gain = mover
            .apply(
                MoveStrategy::WeightedImproving,
                &mut p,
                0,
                &DenseColumn::new(&column),
                &mut rng,
            )
            .unwrap();
        match p.group_of(0) {
            2 => {
                heavy += 1;
                assert!((gain - 3.0).abs() < 1e-15);
            }
            1 => assert!((gain - 1.0).abs() < 1e-15),
            g => panic!("unexpected group {}", g),
        }
    }

    let share = heavy as f64 / trials as f64;
    assert!((share - 0.75).abs() < 0.03, "weighted share was {}", share);
}

#[test]
fn uniform_selection_spreads_over_improving_groups() {
    let column = [0.0, 1.0, 3.0];
    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(77);
    let trials = 4_000;
    let mut heavy = 0usize;

    for _ in 0..trials {
        let mut p = Partition::singletons(3);
        mover
            .apply(
                MoveStrategy::UniformImproving,
                &mut p,
                0,
                &DenseColumn::new(&column),
                &mut rng,
            )
            .unwrap();
        if p.group_of(0) == 2 {
            heavy += 1;
        }
    }

    let share = heavy as f64 / trials as f64;
    assert!((share - 0.5).abs() < 0.05, "uniform share was {}", share);
}

#[test]
fn wrong_column_length_is_rejected_without_moving() {
    let mut p = Partition::singletons(3);
    let mut mover = Mover::new();
    let mut rng = SessionRng::from_seed(0);
    let short = OwnedColumn::Dense(vec![0.0, 1.0]);
    let err = mover
        .apply(MoveStrategy::MaxGain, &mut p, 0, &short, &mut rng)
        .unwrap_err();
    assert_eq!(err, Error::Shape { expected: 3, found: 2 });
    assert_eq!(p.assignment(), &[0, 1, 2]);

    let err = mover
        .apply(MoveStrategy::MaxGain, &mut p, 5, &DenseColumn::new(&[0.0; 3]), &mut rng)
        .unwrap_err();
    assert_eq!(err, Error::NodeOutOfRange { node: 5, count: 3 });
}

#[test]
fn malformed_sparse_columns_are_rejected() {
    assert!(matches!(
        SparseColumn::new(3, &[0, 1], &[1.0]),
        Err(Error::MalformedColumn(_))
    ));
    assert!(matches!(
        SparseColumn::new(3, &[0, 3], &[1.0, 2.0]),
        Err(Error::MalformedColumn(_))
    ));
}

#[test]
fn repeated_sparse_rows_are_rejected() {
    assert!(matches!(
        SparseColumn::new(3, &[0, 0, 2], &[2.0, 2.0, 0.1]),
        Err(Error::MalformedColumn(_))
    ));
    assert!(matches!(
        OwnedColumn::sparse(3, vec![2, 1, 2], vec![1.0, 1.0, 1.0]),
        Err(Error::MalformedColumn(_))
    ));
    // unsorted but distinct rows are fine
    assert!(SparseColumn::new(3, &[2, 0], &[1.0, 1.0]).is_ok());
}

#[test]
fn repeated_rows_in_an_owned_column_act_like_their_sum() {
    // node 0 shares group 0 with node 1; its diagonal is listed twice
    let p = Partition::from_labels(&[1, 1, 2]).unwrap();
    let split = OwnedColumn::Sparse {
        len: 3,
        rows: vec![0, 0, 2],
        values: vec![2.0, 2.0, 0.1],
    };
    let dense = [4.0, 0.0, 0.1];

    let mut engine = DeltaEngine::new();
    let from_split: Vec<(u32, f64)> = engine.compute(&p, 0, &split).unwrap().iter().collect();
    let from_dense: Vec<(u32, f64)> = engine
        .compute(&p, 0, &DenseColumn::new(&dense))
        .unwrap()
        .iter()
        .collect();
    assert_eq!(from_split.len(), 2);
    assert_eq!(from_split.len(), from_dense.len());
    for ((gs, ds), (gd, dd)) in from_split.iter().zip(from_dense.iter()) {
        assert_eq!(gs, gd);
        assert!((ds - dd).abs() < 1e-12);
    }
    assert!((from_split[1].1 - 0.1).abs() < 1e-12);
}
