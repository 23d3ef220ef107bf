//! External boundary extraction for anomalous regions.
//!
//! Regions are 4-connected components of set mask cells. Each region yields
//! exactly one contour: its external boundary, traced clockwise in image
//! coordinates (y axis down) starting from the region's first cell in
//! row-major scan order. Hole boundaries are never reported; a set-cell
//! island inside a hole is its own 4-connected region with its own contour.
//!
//! The tracer follows the Moore neighborhood of the current boundary cell
//! but only steps onto cells carrying the region's own label, so two
//! regions touching diagonally never merge into one boundary.

use serde::{Deserialize, Serialize};

use crate::mask::AnomalyMask;

/// Moore neighborhood in clockwise order, starting west: (dx, dy).
const MOORE_CW: [[i64; 2]; 8] = [
    [-1, 0],
    [-1, -1],
    [0, -1],
    [1, -1],
    [1, 0],
    [1, 1],
    [0, 1],
    [-1, 1],
];

/// 4-neighborhood used for region labeling: (dx, dy).
const CROSS: [[i64; 2]; 4] = [[1, 0], [-1, 0], [0, 1], [0, -1]];

/// Ordered boundary of one connected anomalous region.
///
/// Points are `[x, y]` pixel coordinates. Consecutive points are
/// 8-adjacent and the last point connects back to the first; a single-cell
/// region is a single point. Thin shapes legitimately revisit cells where
/// the boundary passes them on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[u32; 2]>,
}

impl Contour {
    /// Number of boundary points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The same boundary shifted by (dx, dy).
    pub fn translated(&self, dx: u32, dy: u32) -> Contour {
        Contour {
            points: self
                .points
                .iter()
                .map(|p| [p[0] + dx, p[1] + dy])
                .collect(),
        }
    }
}

/// Extract the external boundary of every 4-connected region of set cells.
///
/// Contours appear in row-major discovery order of their regions, so
/// identical masks always yield identical sequences. Calling twice on the
/// same mask returns the same result; the mask is never mutated.
pub fn trace_contours(mask: &AnomalyMask) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let (labels, seeds) = label_regions(mask);
    seeds
        .iter()
        .enumerate()
        .map(|(i, &seed)| Contour {
            points: trace_boundary(&labels, width, height, i as u32 + 1, seed),
        })
        .collect()
}

/// Label 4-connected regions of set cells.
///
/// Returns the label grid (0 = unset) and one seed cell per region. Seeds
/// are each region's first cell in raster order, so they are sorted by
/// (y, x) and the seed is the topmost-then-leftmost cell of its region.
fn label_regions(mask: &AnomalyMask) -> (Vec<u32>, Vec<[u32; 2]>) {
    let (width, height) = mask.dimensions();
    let w = width as usize;
    let cells = mask.as_slice();
    let mut labels = vec![0u32; cells.len()];
    let mut seeds = Vec::new();
    let mut stack = Vec::new();

    for y in 0..height as usize {
        for x in 0..w {
            let idx = y * w + x;
            if !cells[idx] || labels[idx] != 0 {
                continue;
            }
            let label = seeds.len() as u32 + 1;
            seeds.push([x as u32, y as u32]);
            labels[idx] = label;
            stack.push([x as i64, y as i64]);
            while let Some([cx, cy]) = stack.pop() {
                for [dx, dy] in CROSS {
                    let nx = cx + dx;
                    let ny = cy + dy;
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if cells[nidx] && labels[nidx] == 0 {
                        labels[nidx] = label;
                        stack.push([nx, ny]);
                    }
                }
            }
        }
    }
    (labels, seeds)
}

/// Follow the external boundary of region `label` starting at its seed.
///
/// Moore-neighbor following with a west backtrack at the seed (the seed has
/// no region cell above or to its left). The walk terminates when the first
/// move repeats with the same entry direction, which closes the boundary
/// even for shapes whose boundary passes the seed more than once.
fn trace_boundary(
    labels: &[u32],
    width: u32,
    height: u32,
    label: u32,
    seed: [u32; 2],
) -> Vec<[u32; 2]> {
    let w = width as i64;
    let h = height as i64;
    let in_region = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w && y < h && labels[y as usize * w as usize + x as usize] == label
    };

    let start = [seed[0] as i64, seed[1] as i64];
    let mut points = vec![seed];
    let mut current = start;
    let mut backtrack = [start[0] - 1, start[1]];
    let mut first_move: Option<([i64; 2], [i64; 2])> = None;

    loop {
        let delta = [backtrack[0] - current[0], backtrack[1] - current[1]];
        let entry = MOORE_CW
            .iter()
            .position(|d| *d == delta)
            .expect("backtrack cell is Moore-adjacent to the current cell");

        // Scan clockwise from the neighbor after the backtrack cell.
        let mut next = None;
        let mut last_empty = backtrack;
        for step in 1..=8 {
            let dir = (entry + step) % 8;
            let q = [current[0] + MOORE_CW[dir][0], current[1] + MOORE_CW[dir][1]];
            if in_region(q[0], q[1]) {
                next = Some(q);
                break;
            }
            last_empty = q;
        }

        let Some(q) = next else {
            // Isolated cell: the contour is the seed alone.
            return points;
        };

        let state = (q, last_empty);
        match first_move {
            None => first_move = Some(state),
            Some(first) if first == state => break,
            Some(_) => {}
        }
        backtrack = last_empty;
        current = q;
        points.push([q[0] as u32, q[1] as u32]);
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}
