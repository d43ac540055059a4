//! Tests for global tile count bounds

#[cfg(test)]
mod tests {
    use wavetile::algorithm::executor::{Resolution, TilePropagator, TilePropagatorOptions};
    use wavetile::analysis::adjacent::AdjacentModel;
    use wavetile::constraints::TileConstraint;
    use wavetile::constraints::count::{CountComparison, CountConstraint};
    use wavetile::io::error::SolverError;
    use wavetile::spatial::directions::{Direction, DirectionSet};
    use wavetile::spatial::topology::{Point, Topology};

    fn free(tiles: &[char]) -> AdjacentModel<char> {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        for direction in [Direction::XPlus, Direction::YPlus] {
            model
                .add_adjacency(tiles.iter().copied(), tiles.iter().copied(), direction)
                .expect("direction in set");
        }
        model
    }

    fn solver(
        tiles: &[char],
        width: usize,
        height: usize,
        constraint: CountConstraint<char>,
    ) -> TilePropagator<char> {
        let constraints: Vec<Box<dyn TileConstraint<char> + Send>> = vec![Box::new(constraint)];
        let options = TilePropagatorOptions {
            constraints,
            ..TilePropagatorOptions::default()
        };
        let topology = Topology::new(width, height, false).expect("valid topology");
        TilePropagator::new(&free(tiles), topology, options).expect("valid setup")
    }

    fn count_of(propagator: &TilePropagator<char>, tile: char) -> usize {
        propagator
            .to_value_array()
            .iter()
            .filter(|value| **value == Some(tile))
            .count()
    }

    // Tests a zero upper bound removes the tile and forbids selecting it
    // Verified by skipping the ban of maybe cells once the bound is reached
    #[test]
    fn test_at_most_zero() {
        let mut propagator = solver(
            &['A', 'B', 'C'],
            3,
            3,
            CountConstraint::new(['A'], CountComparison::AtMost, 0),
        );
        assert_eq!(propagator.status(), Resolution::Undecided);
        assert!(propagator.to_possible_values().iter().all(|values| !values.contains(&'A')));

        let status = propagator.select(Point::new(1, 1), &'A').expect("known tile");
        assert_eq!(status, Resolution::Contradiction);
    }

    // Tests a tight lower bound selects every candidate
    // Verified by comparing against the bound with < instead of ==
    #[test]
    fn test_at_least_tight() {
        let propagator = solver(
            &['A', 'B'],
            2,
            1,
            CountConstraint::new(['A'], CountComparison::AtLeast, 2),
        );
        assert_eq!(propagator.status(), Resolution::Decided);
        assert_eq!(count_of(&propagator, 'A'), 2);
    }

    #[test]
    fn test_at_least_unreachable() {
        let propagator = solver(
            &['A', 'B'],
            2,
            1,
            CountConstraint::new(['A'], CountComparison::AtLeast, 3),
        );
        assert_eq!(propagator.status(), Resolution::Contradiction);
    }

    // Tests an exact bound holds in every solved grid
    #[test]
    fn test_exactly_one_after_run() {
        for seed in 0..5 {
            let constraints: Vec<Box<dyn TileConstraint<char> + Send>> = vec![Box::new(
                CountConstraint::new(['A'], CountComparison::Exactly, 1),
            )];
            let options = TilePropagatorOptions {
                constraints,
                seed,
                ..TilePropagatorOptions::default()
            };
            let topology = Topology::new(3, 3, false).expect("valid topology");
            let mut propagator =
                TilePropagator::new(&free(&['A', 'B']), topology, options).expect("valid setup");

            assert_eq!(propagator.run(), Resolution::Decided);
            assert_eq!(count_of(&propagator, 'A'), 1);
        }
    }

    // Tests eager lower bounds ban candidates until the bound is tight
    // Verified by selecting instead of banning for lower bounds
    #[test]
    fn test_eager_at_least() {
        let propagator = solver(
            &['A', 'B'],
            3,
            3,
            CountConstraint::new(['A'], CountComparison::AtLeast, 3).eager(true),
        );
        assert_eq!(propagator.status(), Resolution::Decided);
        assert_eq!(count_of(&propagator, 'A'), 3);
    }

    #[test]
    fn test_eager_at_most() {
        let propagator = solver(
            &['A', 'B'],
            3,
            3,
            CountConstraint::new(['A'], CountComparison::AtMost, 2).eager(true),
        );
        assert_eq!(propagator.status(), Resolution::Decided);
        assert_eq!(count_of(&propagator, 'A'), 2);
    }

    #[test]
    fn test_unknown_tile_fails_init() {
        let constraints: Vec<Box<dyn TileConstraint<char> + Send>> = vec![Box::new(
            CountConstraint::new(['Q'], CountComparison::AtMost, 1),
        )];
        let options = TilePropagatorOptions {
            constraints,
            ..TilePropagatorOptions::default()
        };
        let topology = Topology::new(2, 2, false).expect("valid topology");
        let result = TilePropagator::new(&free(&['A']), topology, options);
        assert!(matches!(result, Err(SolverError::UnknownTile { .. })));
    }

    #[test]
    fn test_accessors() {
        let constraint = CountConstraint::new(['A', 'B'], CountComparison::Exactly, 4);
        assert_eq!(constraint.tiles(), &['A', 'B']);
        assert_eq!(constraint.comparison(), CountComparison::Exactly);
        assert_eq!(constraint.count(), 4);
    }
}
