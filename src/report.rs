//! Dated, fixed-width text output for balance records.
use crate::balance::{BalanceRecord, BalanceSummary};
use crate::errors::WbError;
use std::io::Write;

/// Column names for the balance output file, in print order.
pub const COLUMNS: [&str; 17] = [
    "date",
    "surface_excess",
    "canopy_storage",
    "soil_moisture",
    "swq",
    "sat_flow",
    "channel_int",
    "road_int",
    "culvert_return",
    "et",
    "precip",
    "snow_vapor",
    "canopy_vapor",
    "storage",
    "culvert_to_chan",
    "runoff_to_chan",
    "error",
];

/// Line-oriented writer for the balance output file.
///
/// Each record becomes one dated row of fixed-width columns in the order of
/// [COLUMNS](constant.COLUMNS.html).  Dates are stamped `MM/DD/YYYY-HH`.
/// Works over any [std::io::Write] sink, a file in practice.
pub struct BalanceWriter<W: Write> {
    inner: W,
}

impl<W: Write> BalanceWriter<W> {
    /// Wrap a sink.
    pub fn new(inner: W) -> Self {
        BalanceWriter { inner }
    }

    /// Write the column-name header line.
    pub fn header(&mut self) -> Result<(), WbError> {
        writeln!(self.inner, "{}", COLUMNS.join("  "))?;
        Ok(())
    }

    /// Write one dated record row.
    pub fn write_record(&mut self, rec: &BalanceRecord) -> Result<(), WbError> {
        writeln!(
            self.inner,
            "{} {:8.4} {:8.4} {:7.3} {:9.4} {:10.2e} {:10.2e} {:6.2} {:6.2} {:8.4} {:8.4} {:8.4} {:7.3} {:10.2e} {:6.2} {:10.2e} {:8.3}",
            rec.when.format("%m/%d/%Y-%H"),
            rec.surface_excess,
            rec.canopy_storage,
            rec.soil_moisture,
            rec.snow_water_equivalent,
            rec.sat_flow,
            rec.channel_interception,
            rec.road_interception,
            rec.culvert_return_flow,
            rec.evapotranspiration,
            rec.precipitation,
            rec.snow_vapor_flux,
            rec.canopy_vapor_flux,
            rec.storage,
            rec.culvert_to_channel,
            rec.runoff_to_channel,
            rec.error,
        )?;
        Ok(())
    }

    /// Hand the sink back, flushing first.
    pub fn into_inner(mut self) -> Result<W, WbError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write the run-level closure block.
pub fn write_summary<W: Write>(w: &mut W, summary: &BalanceSummary) -> Result<(), WbError> {
    writeln!(w, "water balance closure")?;
    writeln!(w, "  inflow           {:14.6} m", summary.inflow)?;
    writeln!(w, "  outflow          {:14.6} m", summary.outflow)?;
    writeln!(w, "  storage change   {:14.6} m", summary.storage_change)?;
    writeln!(w, "  residual         {:14.6e} m", summary.residual)?;
    writeln!(w, "  residual/inflow  {:14.6e}", summary.relative_residual)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::MassBalance;
    use crate::totals::BasinTotals;
    use chrono::NaiveDate;

    fn sample_record() -> BalanceRecord {
        let mut mass = MassBalance::new(0.5);
        let mut totals = BasinTotals::default();
        totals.precipitation = 0.03;
        totals.evapotranspiration = 0.01;
        totals.soil_moisture = 0.52;
        let when = NaiveDate::from_ymd_opt(2020, 10, 1)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        mass.step(when, &totals)
    }

    #[test]
    fn record_row_is_dated() {
        let mut wtr = BalanceWriter::new(Vec::new());
        wtr.write_record(&sample_record()).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("10/01/2020-03 "));
        assert_eq!(1, out.lines().count());
    }

    #[test]
    fn header_names_every_column() {
        let mut wtr = BalanceWriter::new(Vec::new());
        wtr.header().unwrap();
        wtr.write_record(&sample_record()).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert!(header.starts_with("date"));
        assert!(header.contains("error"));
        assert_eq!(COLUMNS.len(), header.split_whitespace().count());
    }

    #[test]
    fn summary_block_reports_closure() {
        let mut mass = MassBalance::new(0.5);
        let mut totals = BasinTotals::default();
        totals.precipitation = 0.03;
        totals.soil_moisture = 0.53;
        let when = NaiveDate::from_ymd_opt(2020, 10, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        mass.step(when, &totals);
        let mut out = Vec::new();
        write_summary(&mut out, &mass.summary()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("water balance closure"));
        assert!(text.contains("residual/inflow"));
        assert_eq!(6, text.lines().count());
    }
}
