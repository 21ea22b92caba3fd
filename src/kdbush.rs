//! # KDBush module
//!
//! A static 2-D KD-tree over a flat coordinate buffer, ported from
//! [mourner/kdbush](https://github.com/mourner/kdbush). Construction
//! reorders a `(coords, ids)` pair in place around alternating-axis medians
//! (an iterative quickselect partition known as Floyd-Rivest `select`);
//! subranges of length `<= node_size` are left unsorted and scanned linearly
//! at query time. The tree is immutable once built.

use std::cmp;

/// Default leaf node size, matching the reference implementation.
pub const DEFAULT_NODE_SIZE: usize = 64;

/// A static 2-D KD-tree. Built once from a slice of points; `range` and
/// `within` queries never mutate it afterwards.
#[derive(Clone, Debug)]
pub struct KDBush {
    /// Ids of the indexed points, reordered in step with `coords` during
    /// construction so that `ids[i]` identifies the point stored at
    /// `coords[2*i], coords[2*i+1]`.
    ids: Vec<usize>,

    /// Interleaved `x, y` pairs, reordered during construction.
    coords: Vec<f64>,

    /// Leaf node size: subranges this small or smaller are scanned linearly
    /// instead of descended into.
    node_size: usize,
}

impl KDBush {
    /// Build a KD-tree over `points` (each `(x, y)`), with leaf node size
    /// `node_size`. Ids handed back by `range`/`within` are indices into
    /// `points`.
    pub fn build(points: &[(f64, f64)], node_size: usize) -> Self {
        let n = points.len();
        let mut ids: Vec<usize> = (0..n).collect();
        let mut coords = vec![0.0; n * 2];

        for (i, (x, y)) in points.iter().enumerate() {
            coords[2 * i] = *x;
            coords[2 * i + 1] = *y;
        }

        if n > 0 {
            sort_kd(&mut ids, &mut coords, node_size, 0, n as isize - 1, 0);
        }

        KDBush {
            ids,
            coords,
            node_size,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All ids whose point lies inside the closed axis-aligned box
    /// `[min_x, max_x] × [min_y, max_y]`. Unspecified order.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let mut result = Vec::new();
        if self.ids.is_empty() {
            return result;
        }

        // Explicit stack of (left, right, axis) frames, as opposed to
        // recursing through the query — construction still recurses (it's
        // a one-time cost), but queries run on every lookup.
        let mut stack = vec![(0usize, self.ids.len() - 1, 0u8)];

        while let Some((left, right, axis)) = stack.pop() {
            if right - left <= self.node_size {
                for i in left..=right {
                    let x = self.coords[2 * i];
                    let y = self.coords[2 * i + 1];
                    if x >= min_x && x <= max_x && y >= min_y && y <= max_y {
                        result.push(self.ids[i]);
                    }
                }
                continue;
            }

            let m = (left + right) >> 1;
            let x = self.coords[2 * m];
            let y = self.coords[2 * m + 1];

            if x >= min_x && x <= max_x && y >= min_y && y <= max_y {
                result.push(self.ids[m]);
            }

            let next_axis = 1 - axis;
            let lte = if axis == 0 { min_x <= x } else { min_y <= y };
            if lte && m > left {
                stack.push((left, m - 1, next_axis));
            }

            let gte = if axis == 0 { max_x >= x } else { max_y >= y };
            if gte {
                stack.push((m + 1, right, next_axis));
            }
        }

        result
    }

    /// All ids whose point lies within Euclidean radius `r` of `(qx, qy)`.
    /// Unspecified order.
    pub fn within(&self, qx: f64, qy: f64, r: f64) -> Vec<usize> {
        let mut result = Vec::new();
        if self.ids.is_empty() {
            return result;
        }

        let r2 = r * r;
        let mut stack = vec![(0usize, self.ids.len() - 1, 0u8)];

        while let Some((left, right, axis)) = stack.pop() {
            if right - left <= self.node_size {
                for i in left..=right {
                    let x = self.coords[2 * i];
                    let y = self.coords[2 * i + 1];
                    if sq_dist(x, y, qx, qy) <= r2 {
                        result.push(self.ids[i]);
                    }
                }
                continue;
            }

            let m = (left + right) >> 1;
            let x = self.coords[2 * m];
            let y = self.coords[2 * m + 1];

            if sq_dist(x, y, qx, qy) <= r2 {
                result.push(self.ids[m]);
            }

            let next_axis = 1 - axis;
            let lte = if axis == 0 { qx - r <= x } else { qy - r <= y };
            if lte && m > left {
                stack.push((left, m - 1, next_axis));
            }

            let gte = if axis == 0 { qx + r >= x } else { qy + r >= y };
            if gte {
                stack.push((m + 1, right, next_axis));
            }
        }

        result
    }
}

#[inline]
fn sq_dist(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Recursively kd-sort `coords`/`ids` in place: partition `[left, right]`
/// around its median on `axis`, then recurse into each half on the other
/// axis. Ranges of length `<= node_size` are left unsorted.
///
/// Indices are `isize` here (rather than `usize`, as the public query
/// methods use) purely so that an empty half-range — `right < left` — can
/// be represented and short-circuited without wrapping arithmetic; the
/// reference implementations this is ported from rely on signed indices
/// the same way.
fn sort_kd(ids: &mut [usize], coords: &mut [f64], node_size: usize, left: isize, right: isize, axis: u8) {
    if right - left <= node_size as isize {
        return;
    }

    let m = (left + right) >> 1;
    select(ids, coords, m, left, right, axis);

    sort_kd(ids, coords, node_size, left, m - 1, 1 - axis);
    sort_kd(ids, coords, node_size, m + 1, right, 1 - axis);
}

/// Floyd-Rivest selection: rearrange `[left, right]` so that the `k`-th
/// smallest item (by `axis`) sits at index `k`, with everything smaller to
/// its left and everything larger to its right.
fn select(ids: &mut [usize], coords: &mut [f64], k: isize, mut left: isize, mut right: isize, axis: u8) {
    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp(2.0 * z / 3.0);
            let sd = 0.5
                * f64::sqrt(z * s * (n - s) / n)
                * (if 2.0 * m < n { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, (k as f64 - m * s / n + sd).floor() as isize);
            let new_right = cmp::min(right, (k as f64 + (n - m) * s / n + sd).floor() as isize);
            select(ids, coords, k, new_left, new_right, axis);
        }

        let t = coords[2 * k as usize + axis as usize];
        let mut i = left;
        let mut j = right;

        swap_item(ids, coords, left, k);
        if coords[2 * right as usize + axis as usize] > t {
            swap_item(ids, coords, left, right);
        }

        while i < j {
            swap_item(ids, coords, i, j);
            i += 1;
            j -= 1;
            while coords[2 * i as usize + axis as usize] < t {
                i += 1;
            }
            while coords[2 * j as usize + axis as usize] > t {
                j -= 1;
            }
        }

        if coords[2 * left as usize + axis as usize] == t {
            swap_item(ids, coords, left, j);
        } else {
            j += 1;
            swap_item(ids, coords, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

#[inline]
fn swap_item(ids: &mut [usize], coords: &mut [f64], i: isize, j: isize) {
    let (i, j) = (i as usize, j as usize);
    ids.swap(i, j);
    coords.swap(2 * i, 2 * j);
    coords.swap(2 * i + 1, 2 * j + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(f64, f64)> {
        vec![
            (54.0, 1.0),
            (97.0, 21.0),
            (65.0, 35.0),
            (33.0, 54.0),
            (95.0, 39.0),
            (54.0, 3.0),
            (53.0, 54.0),
            (84.0, 72.0),
            (33.0, 34.0),
            (43.0, 15.0),
            (52.0, 83.0),
            (81.0, 23.0),
            (1.0, 61.0),
            (38.0, 74.0),
            (11.0, 91.0),
            (24.0, 56.0),
        ]
    }

    #[test]
    fn range_finds_all_points_in_box() {
        let points = sample_points();
        let tree = KDBush::build(&points, 4);
        let mut ids = tree.range(20.0, 30.0, 60.0, 60.0);
        ids.sort_unstable();

        let mut expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| (20.0..=60.0).contains(x) && (30.0..=60.0).contains(y))
            .map(|(i, _)| i)
            .collect();
        expected.sort_unstable();

        assert_eq!(ids, expected);
    }

    #[test]
    fn within_finds_all_points_in_radius() {
        let points = sample_points();
        let tree = KDBush::build(&points, 4);
        let mut ids = tree.within(50.0, 50.0, 20.0);
        ids.sort_unstable();

        let mut expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| sq_dist(*x, *y, 50.0, 50.0) <= 400.0)
            .map(|(i, _)| i)
            .collect();
        expected.sort_unstable();

        assert_eq!(ids, expected);
    }

    #[test]
    fn empty_tree_returns_no_results() {
        let tree = KDBush::build(&[], DEFAULT_NODE_SIZE);
        assert!(tree.range(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(tree.within(0.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn single_point_is_found() {
        let tree = KDBush::build(&[(0.5, 0.5)], DEFAULT_NODE_SIZE);
        assert_eq!(tree.range(0.0, 0.0, 1.0, 1.0), vec![0]);
        assert_eq!(tree.within(0.5, 0.5, 0.01), vec![0]);
    }
}
