//! Running mass-balance state and the per-timestep balance check.
use crate::errors::WbError;
use crate::totals::BasinTotals;
use chrono::NaiveDateTime;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs::File;

/// Running water-balance accounting state for a simulation.
///
/// Holds the basin storage at the end of the previous timestep and the
/// cumulative fluxes since the start of the run.  Create one from the basin
/// storage at the start of the simulation, then call
/// [step](#method.step) once per timestep with that step's totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    /// Basin storage at the start of the run [m].
    pub initial_storage: f64,
    /// Basin storage at the end of the last completed step [m].
    pub storage: f64,
    /// Cumulative precipitation [m].
    pub cum_precip: f64,
    /// Cumulative surface excess [m].
    pub cum_surface_excess: f64,
    /// Cumulative flux intercepted by the channel network [m].
    pub cum_channel_interception: f64,
    /// Cumulative flux intercepted by road drainage [m].
    pub cum_road_interception: f64,
    /// Cumulative evapotranspiration [m].
    pub cum_evapotranspiration: f64,
    /// Cumulative vapor exchange, snowpack and canopy combined [m].
    pub cum_snow_vapor_flux: f64,
    /// Cumulative culvert flow returned to the surface [m].
    pub cum_culvert_return_flow: f64,
    /// Cumulative culvert flow routed to the channel [m].
    pub cum_culvert_to_channel: f64,
    /// Cumulative surface runoff routed to the channel [m].
    pub cum_runoff_to_channel: f64,
}

/// Dated report row for one timestep of the balance check.
///
/// Carries the step's storage and flux terms, the end-of-step basin storage,
/// and the mass-balance residual.  Column order follows the balance output
/// file of the host model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Timestep date.
    pub when: NaiveDateTime,
    /// Infiltration excess ponded on the land surface [m].
    pub surface_excess: f64,
    /// Water intercepted in the canopy [m].
    pub canopy_storage: f64,
    /// Water held in the soil column [m].
    pub soil_moisture: f64,
    /// Snow water equivalent of the pack [m].
    pub snow_water_equivalent: f64,
    /// Saturated subsurface flow in transit [m].
    pub sat_flow: f64,
    /// Flux intercepted by the channel network [m].
    pub channel_interception: f64,
    /// Flux intercepted by road drainage [m].
    pub road_interception: f64,
    /// Culvert flow returned to the land surface [m].
    pub culvert_return_flow: f64,
    /// Total evapotranspiration [m].
    pub evapotranspiration: f64,
    /// Precipitation reaching the basin [m].
    pub precipitation: f64,
    /// Vapor exchange with the snowpack [m].
    pub snow_vapor_flux: f64,
    /// Vapor exchange with canopy-intercepted snow [m].
    pub canopy_vapor_flux: f64,
    /// Basin storage at the end of the step [m].
    pub storage: f64,
    /// Culvert flow routed to the channel network [m].
    pub culvert_to_channel: f64,
    /// Surface runoff routed to the channel network [m].
    pub runoff_to_channel: f64,
    /// Mass-balance residual for the step [m].
    pub error: f64,
}

/// Run-level closure report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceSummary {
    /// Cumulative water into the basin [m].
    pub inflow: f64,
    /// Cumulative water out of the basin [m].
    pub outflow: f64,
    /// Net change in basin storage over the run [m].
    pub storage_change: f64,
    /// Closure residual, storage change plus outflow minus inflow [m].
    pub residual: f64,
    /// Residual as a fraction of cumulative inflow.
    pub relative_residual: f64,
}

impl MassBalance {
    /// Start accounting from the basin storage at the beginning of the run.
    pub fn new(initial_storage: f64) -> Self {
        MassBalance {
            initial_storage,
            storage: initial_storage,
            cum_precip: 0.0,
            cum_surface_excess: 0.0,
            cum_channel_interception: 0.0,
            cum_road_interception: 0.0,
            cum_evapotranspiration: 0.0,
            cum_snow_vapor_flux: 0.0,
            cum_culvert_return_flow: 0.0,
            cum_culvert_to_channel: 0.0,
            cum_runoff_to_channel: 0.0,
        }
    }

    /// Check the balance for one timestep and roll the accounting forward.
    ///
    /// The residual is the change in basin storage plus the water leaving
    /// the basin minus the water entering it:
    ///
    /// ```text
    /// error = (storage - old_storage) + outflow - inflow
    /// ```
    ///
    /// A perfectly conservative step yields zero up to f64 rounding.  The
    /// step always succeeds; the residual is a diagnostic, not a guard.
    /// Cumulative fluxes are updated before the record is returned, so the
    /// record's `storage` field carries the end-of-step value.
    pub fn step(&mut self, when: NaiveDateTime, totals: &BasinTotals) -> BalanceRecord {
        let new_storage = totals.storage();
        let error = (new_storage - self.storage) + totals.outflow() - totals.inflow();

        self.storage = new_storage;
        self.cum_precip += totals.precipitation;
        self.cum_surface_excess += totals.surface_excess;
        self.cum_channel_interception += totals.channel_interception;
        self.cum_road_interception += totals.road_interception;
        self.cum_evapotranspiration += totals.evapotranspiration;
        self.cum_snow_vapor_flux += totals.snow_vapor_flux + totals.canopy_vapor_flux;
        self.cum_culvert_return_flow += totals.culvert_return_flow;
        self.cum_culvert_to_channel += totals.culvert_to_channel;
        self.cum_runoff_to_channel += totals.runoff_to_channel;

        log::trace!("balance residual at {}: {:e} m", when, error);

        BalanceRecord {
            when,
            surface_excess: totals.surface_excess,
            canopy_storage: totals.canopy_storage,
            soil_moisture: totals.soil_moisture,
            snow_water_equivalent: totals.snow_water_equivalent,
            sat_flow: totals.sat_flow,
            channel_interception: totals.channel_interception,
            road_interception: totals.road_interception,
            culvert_return_flow: totals.culvert_return_flow,
            evapotranspiration: totals.evapotranspiration,
            precipitation: totals.precipitation,
            snow_vapor_flux: totals.snow_vapor_flux,
            canopy_vapor_flux: totals.canopy_vapor_flux,
            storage: new_storage,
            culvert_to_channel: totals.culvert_to_channel,
            runoff_to_channel: totals.runoff_to_channel,
            error,
        }
    }

    /// Closure report over the whole run so far.
    ///
    /// The summary residual equals the sum of the per-step residuals up to
    /// f64 rounding, since both apply the same arithmetic to the same
    /// cumulative terms.  Relative residual is 0.0 when cumulative inflow
    /// is zero.
    pub fn summary(&self) -> BalanceSummary {
        let inflow = self.cum_precip + self.cum_snow_vapor_flux + self.cum_culvert_return_flow;
        let outflow = self.cum_channel_interception
            + self.cum_road_interception
            + self.cum_evapotranspiration;
        let storage_change = self.storage - self.initial_storage;
        let residual = storage_change + outflow - inflow;
        let relative_residual = if inflow == 0.0 { 0.0 } else { residual / inflow };
        BalanceSummary {
            inflow,
            outflow,
            storage_change,
            residual,
            relative_residual,
        }
    }
}

impl BalanceRecord {
    /// Convert csv records to a vector of BalanceRecord structs.
    pub fn read(path: &str) -> Result<Vec<BalanceRecord>, WbError> {
        let mut records = Vec::new();
        let var = File::open(path)?;
        let mut rdr = csv::Reader::from_reader(var);
        for result in rdr.records() {
            let row = result?;
            let row: BalanceRecord = row.deserialize(None)?;
            records.push(row);
        }
        Ok(records)
    }

    /// Write balance records to a csv file.
    pub fn record(rec: &mut Vec<BalanceRecord>, title: &str) -> Result<(), WbError> {
        let mut wtr = Writer::from_path(title)?;
        for i in rec {
            wtr.serialize(i)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
