//! Beeline distance skims.

use rayon::ThreadPool;

use skim_matrix::FloatMatrix;

use crate::SkimResult;
use crate::parallel::for_each_row;
use crate::zones::{ZoneId, Zones};

/// Mean straight-line distance over all pairs of sampling points.
pub(crate) fn calc_beeline_matrix<Z: ZoneId>(zones: &Zones<Z>, pool: &ThreadPool) -> SkimResult<FloatMatrix<Z>> {
    log::info!("calc beeline distance matrix");
    let mut matrix = FloatMatrix::square(zones.ids().to_vec())?;
    for_each_row(pool, vec![&mut matrix], |row, blocks| {
        let from = zones.points(row);
        for col in 0..zones.len() {
            let to = zones.points(col);
            let total: f64 = from.iter().flat_map(|a| to.iter().map(move |b| a.distance(*b))).sum();
            blocks[0].set(row, col, (total / (from.len() * to.len()) as f64) as f32);
        }
        Ok(())
    })?;
    Ok(matrix)
}
