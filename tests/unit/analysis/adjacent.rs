//! Tests for the explicit adjacency model

#[cfg(test)]
mod tests {
    use wavetile::algorithm::bitset::PatternSet;
    use wavetile::analysis::adjacent::AdjacentModel;
    use wavetile::analysis::model::TileModel;
    use wavetile::io::error::SolverError;
    use wavetile::spatial::directions::{Direction, DirectionSet};

    #[test]
    fn test_add_tile_is_idempotent() {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        assert_eq!(model.add_tile("grass"), 0);
        assert_eq!(model.add_tile("water"), 1);
        assert_eq!(model.add_tile("grass"), 0);
        assert_eq!(model.tiles(), &["grass", "water"]);
        assert_eq!(model.frequency(&"water").ok(), Some(1.0));
    }

    // Tests a declared adjacency is also allowed in reverse
    // Verified by compiling with allow_one_sided instead of allow
    #[test]
    fn test_adjacency_is_mirrored() {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        model
            .add_adjacency(['a'], ['b', 'c'], Direction::XPlus)
            .expect("direction in set");

        let right_of_a = model
            .allowed_neighbors(&'a', Direction::XPlus)
            .expect("known tile");
        let left_of_c = model
            .allowed_neighbors(&'c', Direction::XMinus)
            .expect("known tile");
        let a = model.add_tile('a');
        assert_eq!(right_of_a.count(), 2);
        assert!(!right_of_a.contains(a));
        assert_eq!(left_of_c, PatternSet::from_patterns(3, [a]));
        assert!(model.compile().and_then(|m| m.validate()).is_ok());
    }

    #[test]
    fn test_direction_outside_set_rejected() {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        let result = model.add_adjacency([1], [2], Direction::ZPlus);
        assert!(matches!(
            result,
            Err(SolverError::InvalidParameter {
                parameter: "direction",
                ..
            })
        ));
        assert!(model.tiles().is_empty());
    }

    // Tests frequencies must be positive and finite
    // Verified by accepting zero frequencies
    #[test]
    fn test_frequency_validation() {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian2d);
        assert!(model.set_frequency('a', 0.0).is_err());
        assert!(model.set_frequency('a', f64::INFINITY).is_err());
        assert!(model.set_frequency('a', 2.5).is_ok());
        assert_eq!(model.frequency(&'a').ok(), Some(2.5));

        model.set_uniform_frequency();
        assert_eq!(model.frequency(&'a').ok(), Some(1.0));
        assert!(matches!(
            model.frequency(&'z'),
            Err(SolverError::UnknownTile { .. })
        ));
    }

    #[test]
    fn test_compile_uses_tile_order() {
        let mut model = AdjacentModel::new(DirectionSet::Cartesian3d);
        model.add_tile('x');
        model
            .add_adjacency(['x', 'y'], ['x', 'y'], Direction::ZPlus)
            .expect("direction in set");
        model.set_frequency('y', 4.0).expect("positive");

        let compiled = model.compile().expect("compiles");
        assert_eq!(model.directions(), DirectionSet::Cartesian3d);
        assert_eq!(compiled.pattern_count(), 2);
        assert_eq!(compiled.frequencies, vec![1.0, 4.0]);
        assert_eq!(compiled.mapping.tile_of(1), Some(&'y'));
    }
}
