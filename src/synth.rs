//! Synthetic basin driver for exercising the accounting end to end.
//!
//! A lumped two-store bucket: storms arrive as an exponential process and
//! fill the canopy and soil, a fraction of each store evaporates every step,
//! and a fraction of the soil drains to the channel.  Every movement of
//! water is booked as a tracked flux, so the balance residual of a run is
//! zero to rounding.  An optional leak removes soil water without booking a
//! flux, injecting a known imbalance for testing the diagnostic.
use crate::errors::WbError;
use crate::totals::BasinTotals;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Canopy interception capacity [m].
const CANOPY_CAPACITY: f64 = 0.002;

/// Lumped synthetic basin.
///
/// Build with [new](#method.new) and the setter methods, in the same
/// builder style as the rest of the crate's configuration.  With no storm
/// rate set the basin receives no precipitation and simply drains.
#[derive(Debug, Clone)]
pub struct SynthBasin {
    storm: Option<Exp<f64>>,
    depth: Uniform<f64>,
    et_coeff: f64,
    drain_coeff: f64,
    leak: f64,
    canopy: f64,
    soil: f64,
    next_storm: f64,
}

impl SynthBasin {
    /// A dry-weather basin: no storms, soil at 0.3 m, 1% evaporation and
    /// 5% drainage per step.
    pub fn new() -> Self {
        SynthBasin {
            storm: None,
            depth: Uniform::from(0.002..0.01),
            et_coeff: 0.01,
            drain_coeff: 0.05,
            leak: 0.0,
            canopy: 0.0,
            soil: 0.3,
            next_storm: 0.0,
        }
    }

    /// Assign a storm arrival rate in storms per timestep.
    /// Converts the rate into an exponential inter-arrival distribution.
    ///
    /// # Examples
    ///
    /// ```
    /// use watbal::prelude::*;
    /// let basin = SynthBasin::new().storm_rate(&0.3)?;
    /// # Ok::<(), WbError>(())
    /// ```
    pub fn storm_rate(mut self, rate: &f64) -> Result<Self, WbError> {
        self.storm = Some(Exp::new(*rate)?);
        Ok(self)
    }

    /// Storm depths sample uniformly from `low..high` meters.
    pub fn storm_depth(mut self, low: f64, high: f64) -> Self {
        self.depth = Uniform::from(low..high);
        self
    }

    /// Fraction of each store lost to evaporation per step.
    pub fn et_coeff(mut self, coeff: f64) -> Self {
        self.et_coeff = coeff;
        self
    }

    /// Fraction of the soil store drained to the channel per step.
    pub fn drain_coeff(mut self, coeff: f64) -> Self {
        self.drain_coeff = coeff;
        self
    }

    /// Soil water removed per step without a booked flux [m].
    /// The balance residual of a leaky step is minus the leaked depth.
    pub fn leak(mut self, depth: f64) -> Self {
        self.leak = depth;
        self
    }

    /// Initial soil store [m].
    pub fn soil_moisture(mut self, depth: f64) -> Self {
        self.soil = depth;
        self
    }

    /// Current basin storage [m], for seeding a
    /// [MassBalance](../balance/struct.MassBalance.html).
    pub fn storage(&self) -> f64 {
        self.canopy + self.soil
    }

    /// Advance the basin one timestep and report its totals.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> BasinTotals {
        let mut precip = 0.0;
        if let Some(storm) = self.storm {
            self.next_storm -= 1.0;
            while self.next_storm <= 0.0 {
                precip += self.depth.sample(rng);
                self.next_storm += storm.sample(rng);
            }
        }

        let interception = precip.min((CANOPY_CAPACITY - self.canopy).max(0.0));
        let throughfall = precip - interception;
        self.canopy += interception;
        self.soil += throughfall;

        let et_canopy = self.et_coeff * self.canopy;
        let et_soil = self.et_coeff * self.soil;
        self.canopy -= et_canopy;
        self.soil -= et_soil;

        let drain = self.drain_coeff * self.soil;
        self.soil -= drain;

        let leaked = self.leak.min(self.soil);
        self.soil -= leaked;

        let mut totals = BasinTotals::default();
        totals.canopy_storage = self.canopy;
        totals.soil_moisture = self.soil;
        totals.precipitation = precip;
        totals.evapotranspiration = et_canopy + et_soil;
        totals.channel_interception = drain;
        totals
    }

    /// Run the basin for a number of steps.
    pub fn run<R: Rng>(&mut self, steps: usize, rng: &mut R) -> Vec<BasinTotals> {
        let mut record = Vec::with_capacity(steps);
        for _ in 0..steps {
            record.push(self.step(rng));
        }
        record
    }
}

impl Default for SynthBasin {
    fn default() -> Self {
        SynthBasin::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::MassBalance;
    use crate::utils;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(step: usize) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 10, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::days(step as i64)
    }

    #[test]
    fn dry_basin_closes() {
        let mut basin = SynthBasin::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut mass = MassBalance::new(basin.storage());
        for step in 0..50 {
            let totals = basin.step(&mut rng);
            let rec = mass.step(date(step), &totals);
            assert!(rec.error.abs() < 1e-12);
        }
        // the basin drained, it did not fill
        assert!(mass.summary().storage_change < 0.0);
    }

    #[test]
    fn stormy_basin_closes() {
        let mut basin = SynthBasin::new()
            .storm_rate(&0.4)
            .unwrap()
            .storm_depth(0.002, 0.02);
        let mut rng = StdRng::seed_from_u64(42);
        let mut mass = MassBalance::new(basin.storage());
        for step in 0..200 {
            let totals = basin.step(&mut rng);
            let rec = mass.step(date(step), &totals);
            assert!(rec.error.abs() < 1e-12);
        }
        assert!(mass.cum_precip > 0.0);
    }

    #[test]
    fn leak_appears_in_residual() {
        let mut basin = SynthBasin::new().soil_moisture(0.5).leak(0.0005);
        let mut rng = StdRng::seed_from_u64(3);
        let mut mass = MassBalance::new(basin.storage());
        let totals = basin.step(&mut rng);
        let rec = mass.step(date(0), &totals);
        assert!((rec.error + 0.0005).abs() < 1e-12);
    }

    #[test]
    fn storm_totals_match_arrival_process() {
        // storms per step ~ rate, so mean precip ~ rate * mean depth
        let mut basin = SynthBasin::new()
            .storm_rate(&0.5)
            .unwrap()
            .storm_depth(0.002, 0.01);
        let mut rng = StdRng::seed_from_u64(11);
        let record = basin.run(2000, &mut rng);
        let precip: Vec<f64> = record.iter().map(|t| t.precipitation).collect();
        let mean = utils::mean(&precip);
        assert!((mean - 0.003).abs() < 0.0015);
    }

    #[test]
    fn bad_storm_rate_is_an_error() {
        assert!(SynthBasin::new().storm_rate(&-1.0).is_err());
        assert!(SynthBasin::new().storm_rate(&0.0).is_err());
    }
}
