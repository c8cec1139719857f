use crate::noderef::NodeRef;

/// Order-sensitive structural equality.
///
/// Values must be equal and the children must be pairwise equal in stored
/// order. Positions are not compared.
impl<T> PartialEq for NodeRef<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.clone(), other.clone())];

        while let Some((x, y)) = pending.pop() {
            if x.ptr_eq(&y) {
                continue;
            }

            let a = x.node();
            let b = y.node();
            if a.value() != b.value() || a.num_children() != b.num_children() {
                return false;
            }
            pending.extend(a.children().iter().cloned().zip(b.children().iter().cloned()));
        }
        true
    }
}

impl<T> Eq for NodeRef<T> where T: Eq {}

impl<T> NodeRef<T>
where
    T: PartialEq,
{
    /// Structural equality ignoring sibling order.
    ///
    /// Every child of `self` must have at least one matching child in `other`.
    /// This does not pair children off one to one, so `other` may hold extra
    /// children, and a single child of `other` may match several of `self`.
    /// See [`NodeRef::equals_unordered_strict`] for a multiset comparison.
    pub fn equals_ignore_order(&self, other: &NodeRef<T>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        let a = self.node();
        let b = other.node();

        a.value() == b.value()
            && a.children().iter().all(|x| {
                b.children()
                    .iter()
                    .any(|y| x.equals_ignore_order(y))
            })
    }

    /// Structural equality ignoring sibling order, where children must pair
    /// off one to one.
    pub fn equals_unordered_strict(&self, other: &NodeRef<T>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        let a = self.node();
        let b = other.node();

        if a.value() != b.value() || a.num_children() != b.num_children() {
            return false;
        }

        let edges: Vec<Vec<bool>> = a
            .children()
            .iter()
            .map(|x| {
                b.children()
                    .iter()
                    .map(|y| x.equals_unordered_strict(y))
                    .collect()
            })
            .collect();

        perfect_matching(&edges)
    }
}

/// Whether the bipartite graph given by `edges[left][right]` has a perfect matching.
fn perfect_matching(edges: &[Vec<bool>]) -> bool {
    let n = edges.len();
    let mut matched: Vec<Option<usize>> = vec![None; n];

    for left in 0..n {
        let mut seen = vec![false; n];
        if !augment(left, edges, &mut seen, &mut matched) {
            return false;
        }
    }
    true
}

fn augment(
    left: usize,
    edges: &[Vec<bool>],
    seen: &mut [bool],
    matched: &mut [Option<usize>],
) -> bool {
    for right in 0..edges[left].len() {
        if !edges[left][right] || seen[right] {
            continue;
        }
        seen[right] = true;

        let free = match matched[right] {
            None => true,
            Some(other) => augment(other, edges, seen, matched),
        };
        if free {
            matched[right] = Some(left);
            return true;
        }
    }
    false
}
