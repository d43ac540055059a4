//! Dihedral transforms for square pattern windows

use ndarray::{Array2, ArrayView2, s};

/// Mirror a window left to right
pub fn reflect<T: Clone>(window: ArrayView2<'_, T>) -> Array2<T> {
    window.slice(s![.., ..;-1]).to_owned()
}

/// Rotate a window a quarter turn
pub fn rotate<T: Clone>(window: ArrayView2<'_, T>) -> Array2<T> {
    window.t().slice(s![.., ..;-1]).to_owned()
}

/// Up to eight dihedral variants of a window
///
/// Variants are produced in the order identity, reflection, rotation,
/// rotation + reflection, two rotations, and so on; `symmetry` caps how many
/// are returned (clamped to 1..=8). Duplicates are kept so callers can count
/// occurrences per variant.
pub fn dihedral_variants<T: Clone>(window: Array2<T>, symmetry: usize) -> Vec<Array2<T>> {
    let symmetry = symmetry.clamp(1, 8);
    let mut variants = Vec::with_capacity(symmetry);
    let mut current = window;

    for index in 0..symmetry {
        if index % 2 == 0 {
            variants.push(current.clone());
        } else {
            variants.push(reflect(current.view()));
            current = rotate(current.view());
        }
    }

    variants
}
