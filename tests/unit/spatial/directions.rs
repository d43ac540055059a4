//! Tests for directions and direction sets

#[cfg(test)]
mod tests {
    use wavetile::spatial::directions::{Direction, DirectionSet};

    // Tests inverse directions cancel their deltas
    #[test]
    fn test_inverse_cancels_delta() {
        for &direction in DirectionSet::Cartesian3d.directions() {
            let forward = direction.delta();
            let back = direction.inverse().delta();
            for axis in 0..3 {
                assert_eq!(forward[axis] + back[axis], 0);
            }
            assert_eq!(direction.inverse().inverse(), direction);
        }
    }

    // Tests index lookups are consistent with the ordering
    // Verified by swapping YPlus and YMinus in the 2D table
    #[test]
    fn test_indices_and_inverse_indices() {
        let set = DirectionSet::Cartesian2d;
        assert_eq!(set.len(), 4);
        assert_eq!(set.index_of(Direction::YPlus), Some(2));
        assert_eq!(set.index_of(Direction::ZPlus), None);
        assert_eq!(set.get(1), Some(Direction::XMinus));
        assert_eq!(set.get(4), None);
        assert_eq!(set.inverse_index(0), Some(1));
        assert_eq!(set.inverse_index(3), Some(2));
        assert_eq!(set.inverse_index(9), None);

        assert_eq!(DirectionSet::Cartesian3d.inverse_index(4), Some(5));
    }
}
