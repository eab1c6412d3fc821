//! Basin-aggregated storage and flux totals.
use crate::errors::WbError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of storage and flux terms tracked per cell and per basin.
pub const N_TERMS: usize = 16;

/// Basin-average storage and flux terms for one timestep.
///
/// All terms are depths of water in meters averaged over the basin area.
/// A distributed host model produces one of these per timestep, either by
/// calling [aggregate](fn.aggregate.html) on its cell fields or by filling
/// the struct from its own accumulators.  The zeroed [Default] corresponds
/// to accumulators reset at the start of a timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BasinTotals {
    /// Infiltration excess ponded on the land surface [m].
    pub surface_excess: f64,
    /// Infiltration excess ponded on the road network [m].
    pub road_excess: f64,
    /// Water intercepted in the canopy [m].
    pub canopy_storage: f64,
    /// Water held in the soil column [m].
    pub soil_moisture: f64,
    /// Snow water equivalent of the pack [m].
    pub snow_water_equivalent: f64,
    /// Saturated subsurface flow in transit [m].
    pub sat_flow: f64,
    /// Water held in surface detention [m].
    pub detention_storage: f64,
    /// Flux intercepted by the channel network [m].
    pub channel_interception: f64,
    /// Flux intercepted by road drainage [m].
    pub road_interception: f64,
    /// Total evapotranspiration [m].
    pub evapotranspiration: f64,
    /// Precipitation reaching the basin [m].
    pub precipitation: f64,
    /// Vapor exchange with the snowpack, negative for net sublimation [m].
    pub snow_vapor_flux: f64,
    /// Vapor exchange with canopy-intercepted snow [m].
    pub canopy_vapor_flux: f64,
    /// Culvert flow returned to the land surface [m].
    pub culvert_return_flow: f64,
    /// Culvert flow routed to the channel network [m].
    pub culvert_to_channel: f64,
    /// Surface runoff routed to the channel network [m].
    pub runoff_to_channel: f64,
}

/// Water state and flux snapshot for a single grid cell.
///
/// Field meanings match [BasinTotals](struct.BasinTotals.html); values are
/// depths in meters over the cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellWater {
    /// Infiltration excess ponded on the land surface [m].
    pub surface_excess: f64,
    /// Infiltration excess ponded on the road network [m].
    pub road_excess: f64,
    /// Water intercepted in the canopy [m].
    pub canopy_storage: f64,
    /// Water held in the soil column [m].
    pub soil_moisture: f64,
    /// Snow water equivalent of the pack [m].
    pub snow_water_equivalent: f64,
    /// Saturated subsurface flow in transit [m].
    pub sat_flow: f64,
    /// Water held in surface detention [m].
    pub detention_storage: f64,
    /// Flux intercepted by the channel network [m].
    pub channel_interception: f64,
    /// Flux intercepted by road drainage [m].
    pub road_interception: f64,
    /// Total evapotranspiration [m].
    pub evapotranspiration: f64,
    /// Precipitation reaching the cell [m].
    pub precipitation: f64,
    /// Vapor exchange with the snowpack [m].
    pub snow_vapor_flux: f64,
    /// Vapor exchange with canopy-intercepted snow [m].
    pub canopy_vapor_flux: f64,
    /// Culvert flow returned to the land surface [m].
    pub culvert_return_flow: f64,
    /// Culvert flow routed to the channel network [m].
    pub culvert_to_channel: f64,
    /// Surface runoff routed to the channel network [m].
    pub runoff_to_channel: f64,
}

impl CellWater {
    /// Flatten to an array in [BasinTotals](struct.BasinTotals.html) field order.
    pub fn to_array(&self) -> [f64; N_TERMS] {
        [
            self.surface_excess,
            self.road_excess,
            self.canopy_storage,
            self.soil_moisture,
            self.snow_water_equivalent,
            self.sat_flow,
            self.detention_storage,
            self.channel_interception,
            self.road_interception,
            self.evapotranspiration,
            self.precipitation,
            self.snow_vapor_flux,
            self.canopy_vapor_flux,
            self.culvert_return_flow,
            self.culvert_to_channel,
            self.runoff_to_channel,
        ]
    }
}

impl BasinTotals {
    /// Build totals from a flat array in field order.
    pub fn from_array(arr: &[f64; N_TERMS]) -> Self {
        BasinTotals {
            surface_excess: arr[0],
            road_excess: arr[1],
            canopy_storage: arr[2],
            soil_moisture: arr[3],
            snow_water_equivalent: arr[4],
            sat_flow: arr[5],
            detention_storage: arr[6],
            channel_interception: arr[7],
            road_interception: arr[8],
            evapotranspiration: arr[9],
            precipitation: arr[10],
            snow_vapor_flux: arr[11],
            canopy_vapor_flux: arr[12],
            culvert_return_flow: arr[13],
            culvert_to_channel: arr[14],
            runoff_to_channel: arr[15],
        }
    }

    /// Total water held in the basin at the end of the timestep [m].
    ///
    /// Sums the seven storage terms: surface and road excess, canopy
    /// storage, soil moisture, snow water equivalent, saturated flow in
    /// transit, and detention storage.
    pub fn storage(&self) -> f64 {
        self.surface_excess
            + self.road_excess
            + self.canopy_storage
            + self.soil_moisture
            + self.snow_water_equivalent
            + self.sat_flow
            + self.detention_storage
    }

    /// Total water entering the basin during the timestep [m].
    ///
    /// Precipitation plus the signed vapor fluxes plus culvert return flow.
    /// Net sublimation makes the vapor terms negative, reducing inflow.
    pub fn inflow(&self) -> f64 {
        self.precipitation + self.snow_vapor_flux + self.canopy_vapor_flux
            + self.culvert_return_flow
    }

    /// Total water leaving the basin during the timestep [m].
    ///
    /// Channel and road interception plus evapotranspiration.
    pub fn outflow(&self) -> f64 {
        self.channel_interception + self.road_interception + self.evapotranspiration
    }
}

fn add_terms(mut a: [f64; N_TERMS], b: [f64; N_TERMS]) -> [f64; N_TERMS] {
    for i in 0..N_TERMS {
        a[i] += b[i];
    }
    a
}

/// Aggregate per-cell water state into basin-average totals.
///
/// `mask` marks the active model cells; inactive cells do not contribute.
/// Cells are assumed to share a uniform area, so the basin value of each
/// term is the mean over active cells.
///
/// # Examples
///
/// ```rust
/// use watbal::totals::{aggregate, CellWater};
///
/// let mut cell = CellWater::default();
/// cell.soil_moisture = 0.4;
/// let cells = vec![cell; 10];
/// let mask = vec![true; 10];
/// let totals = aggregate(&cells, &mask).unwrap();
/// assert!((totals.soil_moisture - 0.4).abs() < 1e-12);
/// ```
pub fn aggregate(cells: &[CellWater], mask: &[bool]) -> Result<BasinTotals, WbError> {
    if cells.len() != mask.len() {
        return Err(WbError::LengthMismatch);
    }
    let active = mask.iter().filter(|m| **m).count();
    if active == 0 {
        return Err(WbError::EmptyBasin);
    }
    let sums = cells
        .par_iter()
        .zip(mask.par_iter())
        .filter(|(_, m)| **m)
        .map(|(c, _)| c.to_array())
        .reduce(|| [0.0; N_TERMS], add_terms);
    log::debug!("aggregated {} of {} cells", active, cells.len());
    let mut means = sums;
    for term in means.iter_mut() {
        *term /= active as f64;
    }
    Ok(BasinTotals::from_array(&means))
}

/// Aggregate per-cell water state with non-uniform cell areas.
///
/// `weights` carries the area of each cell; the basin value of each term is
/// the area-weighted mean over cells with positive weight.  Weights must be
/// finite and non-negative, and must sum above zero.
pub fn aggregate_weighted(cells: &[CellWater], weights: &[f64]) -> Result<BasinTotals, WbError> {
    if cells.len() != weights.len() {
        return Err(WbError::LengthMismatch);
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(WbError::BadWeight);
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(WbError::BadWeight);
    }
    let sums = cells
        .par_iter()
        .zip(weights.par_iter())
        .filter(|(_, w)| **w > 0.0)
        .map(|(c, w)| {
            let mut terms = c.to_array();
            for term in terms.iter_mut() {
                *term *= *w;
            }
            terms
        })
        .reduce(|| [0.0; N_TERMS], add_terms);
    let mut means = sums;
    for term in means.iter_mut() {
        *term /= total;
    }
    Ok(BasinTotals::from_array(&means))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wet_cell(depth: f64) -> CellWater {
        let mut cell = CellWater::default();
        cell.soil_moisture = depth;
        cell.canopy_storage = depth / 10.0;
        cell.precipitation = depth / 5.0;
        cell
    }

    #[test]
    fn uniform_field_aggregates_to_cell_value() {
        let cells = vec![wet_cell(0.3); 25];
        let mask = vec![true; 25];
        let totals = aggregate(&cells, &mask).unwrap();
        assert!((totals.soil_moisture - 0.3).abs() < 1e-12);
        assert!((totals.canopy_storage - 0.03).abs() < 1e-12);
        assert!((totals.precipitation - 0.06).abs() < 1e-12);
    }

    #[test]
    fn masked_cells_do_not_contribute() {
        let mut cells = vec![wet_cell(0.2); 4];
        cells[3] = wet_cell(1000.0);
        let mask = vec![true, true, true, false];
        let totals = aggregate(&cells, &mask).unwrap();
        assert!((totals.soil_moisture - 0.2).abs() < 1e-12);
    }

    #[test]
    fn mean_over_active_cells() {
        let cells = vec![wet_cell(0.1), wet_cell(0.3)];
        let mask = vec![true, true];
        let totals = aggregate(&cells, &mask).unwrap();
        assert!((totals.soil_moisture - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_field_aggregates_to_zero() {
        let cells = vec![CellWater::default(); 8];
        let mask = vec![true; 8];
        let totals = aggregate(&cells, &mask).unwrap();
        assert_eq!(BasinTotals::default(), totals);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let cells = vec![wet_cell(0.1); 3];
        let mask = vec![true; 4];
        assert!(aggregate(&cells, &mask).is_err());
    }

    #[test]
    fn empty_mask_is_an_error() {
        let cells = vec![wet_cell(0.1); 3];
        let mask = vec![false; 3];
        assert!(aggregate(&cells, &mask).is_err());
    }

    #[test]
    fn weighted_mean_matches_hand_calculation() {
        let cells = vec![wet_cell(0.1), wet_cell(0.4)];
        let weights = vec![3.0, 1.0];
        let totals = aggregate_weighted(&cells, &weights).unwrap();
        // (0.1 * 3 + 0.4 * 1) / 4
        assert!((totals.soil_moisture - 0.175).abs() < 1e-12);
    }

    #[test]
    fn bad_weights_are_an_error() {
        let cells = vec![wet_cell(0.1); 2];
        assert!(aggregate_weighted(&cells, &[1.0, -1.0]).is_err());
        assert!(aggregate_weighted(&cells, &[0.0, 0.0]).is_err());
        assert!(aggregate_weighted(&cells, &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn storage_sums_the_storage_terms() {
        let mut totals = BasinTotals::default();
        totals.surface_excess = 0.01;
        totals.road_excess = 0.002;
        totals.canopy_storage = 0.003;
        totals.soil_moisture = 0.4;
        totals.snow_water_equivalent = 0.15;
        totals.sat_flow = 0.02;
        totals.detention_storage = 0.005;
        assert!((totals.storage() - 0.59).abs() < 1e-12);
    }

    #[test]
    fn negative_vapor_flux_reduces_inflow() {
        let mut totals = BasinTotals::default();
        totals.precipitation = 0.01;
        totals.snow_vapor_flux = -0.002;
        totals.canopy_vapor_flux = -0.001;
        assert!((totals.inflow() - 0.007).abs() < 1e-12);
    }
}
