//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node structure and operations
//!
//! Trees are scratch structures: a Boolean operation builds them from its
//! operands' polygon lists, mutates them through the clipping recipe, and
//! flattens the result back into a polygon list. No tree outlives a single
//! operation.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// Ceiling on the number of polygon fragments a BSP operation may route.
///
/// Repeated splitting of near-degenerate geometry can blow up the fragment
/// count; a budget turns that pathological case into a recoverable
/// [`ValidationError::FragmentBudget`] instead of an effective hang.
/// Every fragment that comes out of a plane split is charged against the
/// budget, so the charge bounds total work, not just output size.
#[derive(Debug, Clone)]
pub struct FragmentBudget {
    limit: usize,
    used: usize,
}

impl FragmentBudget {
    pub const fn new(limit: usize) -> Self {
        FragmentBudget { limit, used: 0 }
    }

    /// A budget that never runs out; the plain (non-`_within`) tree
    /// operations run under this.
    pub const fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Number of fragments charged so far.
    pub const fn used(&self) -> usize {
        self.used
    }

    fn charge(&mut self, fragments: usize) -> Result<(), ValidationError> {
        self.used = self.used.saturating_add(fragments);
        if self.used > self.limit {
            Err(ValidationError::FragmentBudget { limit: self.limit })
        } else {
            Ok(())
        }
    }
}

/// A BSP tree node, containing polygons coplanar with its splitting plane
/// plus optional front/back subtrees. A node with no plane is an empty tree.
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree for the *front* half-space.
    pub front: Option<Box<Node<S>>>,

    /// Subtree for the *back* half-space. A built node with **no** back
    /// subtree represents "inside the solid": clipping discards whatever
    /// lands there.
    pub back: Option<Box<Node<S>>>,

    /// Polygons coplanar with `plane` (within tolerance).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Invert the whole subtree so it represents the complement solid: flip
    /// every polygon and plane, swap front/back children, recursively.
    pub fn invert(&mut self) {
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            if let Some(ref mut front) = node.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = node.back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Pick a splitting plane from a sample of the input polygons, scoring
    /// candidates by how few polygons they span and how evenly they divide
    /// the rest. Any polygon's plane would produce a valid tree; the
    /// heuristic only bounds fragment growth and tree depth.
    pub fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        const K_SPANS: Real = 8.0; // Weight for spanning polygons
        const K_BALANCE: Real = 1.0; // Weight for front/back balance

        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        let sample_size = polygons.len().min(20);
        for candidate in polygons.iter().take(sample_size) {
            let plane = &candidate.plane;
            let mut num_front = 0i32;
            let mut num_back = 0i32;
            let mut num_spanning = 0i32;

            for poly in polygons {
                match plane.classify_polygon(poly) {
                    COPLANAR => {}, // Not counted for balance
                    FRONT => num_front += 1,
                    BACK => num_back += 1,
                    SPANNING => num_spanning += 1,
                    _ => num_spanning += 1,
                }
            }

            let score = K_SPANS * num_spanning as Real
                + K_BALANCE * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }
        best_plane
    }

    /// Clip a polygon set against this subtree, returning only the pieces
    /// retained by the partition. See [`Self::clip_polygons_within`].
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        self.clip_polygons_within(polygons, &mut FragmentBudget::unlimited())
            .expect("unlimited fragment budget")
    }

    /// Clip a polygon set against this subtree under a fragment budget.
    ///
    /// Every input polygon is split by this node's plane. Coplanar-front and
    /// coplanar-back pieces join the front/back batches: a node stands for a
    /// half-space partition, not a pure surface, so coplanar pieces must be
    /// clipped further down like anything else. The front batch recurses into
    /// the front subtree (or survives if there is none); the back batch
    /// recurses into the back subtree, or — when there is no back subtree —
    /// is discarded entirely, which is what makes difference and intersection
    /// remove interior geometry.
    pub fn clip_polygons_within(
        &self,
        polygons: &[Polygon<S>],
        budget: &mut FragmentBudget,
    ) -> Result<Vec<Polygon<S>>, ValidationError> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = &node.plane else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                front_parts.extend(coplanar_front);
                back_parts.extend(coplanar_back);
                budget.charge(front_parts.len() + back_parts.len())?;

                front_polys.append(&mut front_parts);
                back_polys.append(&mut back_parts);
            }

            if let Some(front_node) = &node.front {
                if !front_polys.is_empty() {
                    stack.push((front_node, front_polys));
                }
            } else {
                result.extend(front_polys);
            }

            if let Some(back_node) = &node.back {
                if !back_polys.is_empty() {
                    stack.push((back_node, back_polys));
                }
            }
        }
        Ok(result)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        self.clip_to_within(bsp, &mut FragmentBudget::unlimited())
            .expect("unlimited fragment budget");
    }

    /// [`Self::clip_to`] under a fragment budget: replaces every node's
    /// polygon list with the result of clipping it through `bsp`.
    pub fn clip_to_within(
        &mut self,
        bsp: &Node<S>,
        budget: &mut FragmentBudget,
    ) -> Result<(), ValidationError> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = bsp.clip_polygons_within(&node.polygons, budget)?;
            if let Some(front) = node.front.as_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(back);
            }
        }
        Ok(())
    }

    /// Return all polygons in this BSP tree using an iterative approach,
    /// avoiding potential stack overflow of recursive approach
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);

            stack.extend(
                [&node.front, &node.back]
                    .iter()
                    .filter_map(|child| child.as_ref().map(|boxed| boxed.as_ref())),
            );
        }
        result
    }

    /// Insert a polygon set into this (possibly non-empty) tree.
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        self.build_within(polygons, &mut FragmentBudget::unlimited())
            .expect("unlimited fragment budget");
    }

    /// [`Self::build`] under a fragment budget.
    ///
    /// A node with no plane yet adopts one picked from the batch; every
    /// polygon is then split against it, coplanar pieces staying on the node
    /// and front/back pieces recursing into (lazily created) subtrees.
    pub fn build_within(
        &mut self,
        polygons: &[Polygon<S>],
        budget: &mut FragmentBudget,
    ) -> Result<(), ValidationError> {
        if polygons.is_empty() {
            return Ok(());
        }

        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            if node.plane.is_none() {
                node.plane = Some(node.pick_best_splitting_plane(&polys));
            }
            let Some(plane) = node.plane.clone() else {
                continue;
            };

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                budget.charge(
                    coplanar_front.len()
                        + coplanar_back.len()
                        + front_parts.len()
                        + back_parts.len(),
                )?;

                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            if !front.is_empty() {
                let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node.as_mut(), front));
            }

            if !back.is_empty() {
                let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node.as_mut(), back));
            }
        }
        Ok(())
    }
}
