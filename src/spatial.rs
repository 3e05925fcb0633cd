//! Spatial indexing for nearest-cluster lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::Vec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// KD-tree over cluster centers in world space
///
/// Answers "which cluster is closest to this point" for interaction and
/// placement queries without scanning every cluster.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct ClusterIndex {
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

#[cfg(feature = "spatial-index")]
impl ClusterIndex {
    /// Build the index from cluster centers
    ///
    /// Item `i` of the tree is `centers[i]`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_library_dungeon::*;
    /// use glam::Vec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![
    ///     Vec2::new(0.0, 0.0),
    ///     Vec2::new(10.0, 0.0),
    ///     Vec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = ClusterIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Vec2::new(9.0, 1.0)), Some(1));
    /// # }
    /// ```
    pub fn new(centers: &[Vec2]) -> Self {
        if centers.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Whether the index holds no centers
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Index of the center nearest to `position`, `None` when empty
    pub fn find_nearest(&self, position: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }
}
