use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::cost::CostFunction;

/// Side length of every generated shape.
pub const GRID: usize = 9;

/// Lit cells share one intensity drawn from this range.
const MIN_INTENSITY: f64 = 0.75;
const MAX_INTENSITY: f64 = 1.0;

/// The four synthetic shapes the demo network learns to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Square,
    Diamond,
    Plus,
    Cross,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Square, Shape::Diamond, Shape::Plus, Shape::Cross];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Shape {
        Shape::ALL[rng.gen_range(0..Shape::ALL.len())]
    }

    pub fn index(&self) -> usize {
        match self {
            Shape::Square => 0,
            Shape::Diamond => 1,
            Shape::Plus => 2,
            Shape::Cross => 3,
        }
    }

    /// One-hot output profile the network is trained toward.
    pub fn target(&self) -> Vec<f64> {
        let mut one_hot = vec![0.0; Shape::ALL.len()];
        one_hot[self.index()] = 1.0;
        one_hot
    }

    fn is_lit(&self, row: usize, col: usize) -> bool {
        let last = GRID - 1;
        let mid = GRID / 2;
        match self {
            Shape::Square => row == 0 || row == last || col == 0 || col == last,
            Shape::Diamond => row.abs_diff(mid) + col.abs_diff(mid) == mid,
            Shape::Plus => row == mid || col == mid,
            Shape::Cross => row == col || row + col == last,
        }
    }

    /// A `GRID × GRID` outline of this shape with a random ink intensity.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec<f64>> {
        let ink = rng.gen_range(MIN_INTENSITY..MAX_INTENSITY);
        (0..GRID)
            .map(|row| {
                (0..GRID)
                    .map(|col| if self.is_lit(row, col) { ink } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    /// The shape whose target profile has the lowest cost against `output`.
    pub fn best_match(output: &[f64], cost: CostFunction) -> Result<Shape> {
        let mut best = Shape::Square;
        let mut best_cost = f64::INFINITY;
        for shape in Shape::ALL {
            let c = cost.value(output, &shape.target())?;
            if c < best_cost {
                best = shape;
                best_cost = c;
            }
        }
        Ok(best)
    }
}
