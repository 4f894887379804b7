use crate::arrays::Array2D;
use assume::assume;
use multiversion::multiversion;

/// Flattened disjoint set: every node mapped to a dense component number.
#[derive(Debug)]
pub struct ComponentSet {
    pub num_components: u32,
    pub component_assignment: Vec<u32>,
    pub num_component_members: Vec<u32>,
    /// Lowest node index of every component.
    pub component_leaders: Vec<u32>,
}

pub struct DisjointSet {
    parents: Vec<u32>,
}

impl DisjointSet {
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "Size must be larger than zero.");
        assert!(size < u32::MAX, "Size must be smaller than {}", u32::MAX);
        DisjointSet {
            parents: (0..size).collect(),
        }
    }

    /// Joins the trees of `node_i` and `node_j`, the root is always the lower index.
    #[inline]
    pub fn merge(&mut self, node_i: u32, node_j: u32) {
        let mut root_x = node_i as usize;
        let mut root_y = node_j as usize;
        let mut parent_x = self.parents[root_x];
        let mut parent_y = self.parents[root_y];
        while parent_x != parent_y {
            if parent_x > parent_y {
                if root_x as u32 == parent_x {
                    self.parents[root_x] = parent_y;
                    break;
                }
                let z = parent_x as usize;
                parent_x = self.parents[z];
                self.parents[root_x] = parent_y;
                root_x = z;
            } else {
                if root_y as u32 == parent_y {
                    self.parents[root_y] = parent_x;
                    break;
                }
                let z = parent_y as usize;
                parent_y = self.parents[z];
                self.parents[root_y] = parent_x;
                root_y = z;
            }
        }
    }

    /// Numbers the components in order of their leaders (lowest node index).
    pub fn flatten(&self) -> ComponentSet {
        let len = self.parents.len();
        let mut component_assignment = vec![u32::MAX; len];
        let mut num_component_members = Vec::new();
        let mut component_leaders = Vec::new();
        for (i, parent) in self.parents.iter().enumerate() {
            let parent = *parent as usize;
            assume!(unsafe: parent < len, "parent: {parent} > {len}");
            if parent < i {
                // parents always have lower index, so they are already numbered
                let component_no = component_assignment[parent];
                debug_assert_ne!(component_no, u32::MAX);
                component_assignment[i] = component_no;
                num_component_members[component_no as usize] += 1;
            } else {
                component_assignment[i] = component_leaders.len() as u32;
                component_leaders.push(i as u32);
                num_component_members.push(1);
            }
        }
        ComponentSet {
            num_components: component_leaders.len() as u32,
            component_assignment,
            num_component_members,
            component_leaders,
        }
    }
}

/// Builds a disjoint set of 4-connected pixels with equal labels.
#[multiversion(targets = "simd")]
pub fn assign_disjoint_set(labels: &Array2D<i32>) -> DisjointSet {
    let mut cc_set = DisjointSet::new(labels.data.len() as u32);
    let width = labels.width;
    for (index, label) in labels.data.iter().enumerate() {
        let column = index % width;
        if column > 0 && labels.data[index - 1] == *label {
            cc_set.merge((index - 1) as u32, index as u32);
        }
        if index >= width && labels.data[index - width] == *label {
            cc_set.merge((index - width) as u32, index as u32);
        }
    }
    cc_set
}

/// Relabels every 4-connected area of one positive label to consecutive labels `1..=n`, ordered
/// by the first pixel of the area in raster order. Non-positive values stay untouched.
///
/// Returns `n`. A label map straight from the flood has one area per seed that reached at least
/// one pixel, so this also compacts labels of seeds that got overwritten.
pub fn relabel_connected(labels: &mut Array2D<i32>) -> u32 {
    if labels.data.is_empty() {
        return 0;
    }
    let cc_set = assign_disjoint_set(labels).flatten();
    let mut substitute = vec![0i32; cc_set.num_components as usize];
    let mut next_label = 0;
    for (component_no, leader) in cc_set.component_leaders.iter().enumerate() {
        if labels.data[*leader as usize] > 0 {
            next_label += 1;
            substitute[component_no] = next_label;
        }
    }
    for (label, component_no) in labels.data.iter_mut().zip(&cc_set.component_assignment) {
        if *label > 0 {
            *label = substitute[*component_no as usize];
        }
    }
    next_label as u32
}

/// Number of 4-connected areas of positive labels and number of distinct positive labels.
///
/// A valid partition has both equal (every label is one connected area).
pub fn count_label_areas(labels: &Array2D<i32>) -> (u32, u32) {
    if labels.data.is_empty() {
        return (0, 0);
    }
    let cc_set = assign_disjoint_set(labels).flatten();
    let num_areas = cc_set
        .component_leaders
        .iter()
        .filter(|leader| labels.data[**leader as usize] > 0)
        .count() as u32;
    let mut distinct: Vec<i32> = labels.data.iter().copied().filter(|l| *l > 0).collect();
    distinct.sort_unstable();
    distinct.dedup();
    (num_areas, distinct.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::{count_label_areas, relabel_connected, DisjointSet};
    use crate::arrays::Array2D;

    #[test]
    fn disjoint_set_test() {
        let mut set = DisjointSet::new(6);
        set.merge(4, 1);
        set.merge(5, 4);
        set.merge(2, 3);
        let cc = set.flatten();
        assert_eq!(cc.num_components, 3);
        assert_eq!(cc.component_assignment, vec![0, 1, 2, 2, 1, 1]);
        assert_eq!(cc.num_component_members, vec![1, 3, 2]);
        assert_eq!(cc.component_leaders, vec![0, 1, 2]);
    }

    #[test]
    fn relabel_connected_test() {
        #[rustfmt::skip]
        let mut labels = Array2D::from_slice(&[
            7, 7, -1, 7,
            7, -1, 3, 3,
            -1, 9, 9, 0,
        ], 4, 3).unwrap();
        assert_eq!(count_label_areas(&labels), (4, 3));
        assert_eq!(relabel_connected(&mut labels), 4);
        #[rustfmt::skip]
        let expected = [
            1, 1, -1, 2,
            1, -1, 3, 3,
            -1, 4, 4, 0,
        ];
        assert_eq!(labels.data.as_slice(), &expected);
        assert_eq!(count_label_areas(&labels), (4, 4));
    }
}
