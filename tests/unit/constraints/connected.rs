//! Tests for path connectivity over tiles and edged tiles

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use wavetile::algorithm::executor::{
        BacktrackType, Resolution, TilePropagator, TilePropagatorOptions,
    };
    use wavetile::analysis::adjacent::AdjacentModel;
    use wavetile::constraints::TileConstraint;
    use wavetile::constraints::connected::{ConnectedConstraint, PathSpec};
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
        model: &AdjacentModel<char>,
        topology: Topology,
        constraint: ConnectedConstraint<char>,
        backtrack_type: BacktrackType,
    ) -> Result<TilePropagator<char>, SolverError> {
        let constraints: Vec<Box<dyn TileConstraint<char> + Send>> = vec![Box::new(constraint)];
        let options = TilePropagatorOptions {
            constraints,
            backtrack_type,
            ..TilePropagatorOptions::default()
        };
        TilePropagator::new(model, topology, options)
    }

    fn tiles_spec(relevant_cells: Vec<Point>) -> ConnectedConstraint<char> {
        ConnectedConstraint::new(PathSpec::Tiles {
            tiles: vec!['P'],
            relevant_cells,
        })
    }

    // Tests every cell between two endpoints of a corridor is forced onto the path
    // Verified by not selecting separating cells
    #[test]
    fn test_corridor_is_forced() {
        let topology = Topology::new(5, 1, false).expect("valid topology");
        let constraint = tiles_spec(vec![Point::new(0, 0), Point::new(4, 0)]);
        let propagator = solver(&free(&['P', '.']), topology, constraint, BacktrackType::None)
            .expect("valid setup");

        assert_eq!(propagator.status(), Resolution::Decided);
        assert!(propagator
            .to_value_array()
            .iter()
            .all(|value| *value == Some('P')));
    }

    // Tests losing both cells of a column cuts the path
    // Verified by ignoring an unreachable relevant cell
    #[test]
    fn test_blocked_column() {
        // Columns are uniform, so banning one cell of the middle column bans both
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        model
            .add_adjacency(['P', '.'], ['P', '.'], Direction::XPlus)
            .expect("direction in set");
        model
            .add_adjacency_pair('P', 'P', Direction::YPlus)
            .expect("direction in set");
        model
            .add_adjacency_pair('.', '.', Direction::YPlus)
            .expect("direction in set");

        let topology = Topology::new(3, 2, false).expect("valid topology");
        let constraint = tiles_spec(vec![Point::new(0, 0), Point::new(2, 0)]);
        let mut propagator =
            solver(&model, topology, constraint, BacktrackType::None).expect("valid setup");
        assert_eq!(propagator.status(), Resolution::Undecided);

        assert_eq!(
            propagator.ban(Point::new(1, 0), &'P').expect("known tile"),
            Resolution::Contradiction
        );
    }

    // Tests a single remaining detour is forced
    #[test]
    fn test_detour_is_forced() {
        let topology = Topology::new(3, 2, false).expect("valid topology");
        let constraint = tiles_spec(vec![Point::new(0, 0), Point::new(2, 0)]);
        let mut propagator = solver(&free(&['P', '.']), topology, constraint, BacktrackType::None)
            .expect("valid setup");
        assert_eq!(propagator.status(), Resolution::Undecided);

        let status = propagator.ban(Point::new(1, 0), &'P').expect("known tile");
        assert_eq!(status, Resolution::Decided);
        let values = propagator.to_value_array();
        for x in 0..3 {
            assert_eq!(values.get((0, 1, x)), Some(&Some('P')));
        }
        assert_eq!(values.get((0, 0, 1)), Some(&Some('.')));
    }

    // Tests definite path cells connect each other when no cells are listed
    #[test]
    fn test_implicit_relevant_cells() {
        let topology = Topology::new(3, 1, false).expect("valid topology");
        let mut propagator = solver(
            &free(&['P', '.']),
            topology,
            tiles_spec(Vec::new()),
            BacktrackType::None,
        )
        .expect("valid setup");

        propagator.select(Point::new(0, 0), &'P').expect("known tile");
        assert_eq!(propagator.status(), Resolution::Undecided);
        let status = propagator.select(Point::new(2, 0), &'P').expect("known tile");
        assert_eq!(status, Resolution::Decided);
        let values = propagator.to_value_array();
        assert_eq!(values.get((0, 0, 1)), Some(&Some('P')));
    }

    #[test]
    fn test_relevant_cell_out_of_range() {
        let topology = Topology::new(3, 3, false).expect("valid topology");
        let result = solver(
            &free(&['P', '.']),
            topology,
            tiles_spec(vec![Point::new(3, 0)]),
            BacktrackType::None,
        );
        assert!(matches!(
            result,
            Err(SolverError::CoordinateOutOfRange { .. })
        ));
    }

    fn edged(exits: Vec<(char, Vec<Direction>)>, relevant_cells: Vec<Point>) -> ConnectedConstraint<char> {
        let exits: HashMap<char, HashSet<Direction>> = exits
            .into_iter()
            .map(|(tile, directions)| (tile, directions.into_iter().collect()))
            .collect();
        ConnectedConstraint::new(PathSpec::Edged {
            exits,
            relevant_cells,
        })
    }

    // Tests two path tiles side by side only connect through facing exits
    // Verified by treating every adjacent pair of path cells as connected
    #[test]
    fn test_edged_exits_must_face() {
        let model = free(&['|', '-']);
        let relevant = vec![Point::new(0, 0), Point::new(1, 0)];

        let vertical = edged(
            vec![
                ('|', vec![Direction::YMinus, Direction::YPlus]),
                ('-', vec![Direction::YMinus, Direction::YPlus]),
            ],
            relevant.clone(),
        );
        let topology = Topology::new(2, 1, false).expect("valid topology");
        let propagator =
            solver(&model, topology, vertical, BacktrackType::None).expect("valid setup");
        assert_eq!(propagator.status(), Resolution::Contradiction);

        let horizontal = edged(
            vec![
                ('-', vec![Direction::XMinus, Direction::XPlus]),
                ('|', vec![Direction::YMinus, Direction::YPlus]),
            ],
            relevant,
        );
        let topology = Topology::new(2, 1, false).expect("valid topology");
        let mut propagator =
            solver(&model, topology, horizontal, BacktrackType::Backtrack).expect("valid setup");
        assert_eq!(propagator.run(), Resolution::Decided);
        assert!(propagator
            .to_value_array()
            .iter()
            .all(|value| *value == Some('-')));
    }

    #[test]
    fn test_spec_accessor() {
        let constraint = tiles_spec(vec![Point::new(1, 2)]).with_pick_heuristic(true);
        assert!(matches!(
            constraint.spec(),
            PathSpec::Tiles { relevant_cells, .. } if relevant_cells == &[Point::new(1, 2)]
        ));
    }
}
