use chrono::{Duration, NaiveDate};
use std::fs::File;
use watbal::prelude::*;

/// Runs the synthetic basin for a water year and writes the balance record
/// as text, csv and plots.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let mut basin = SynthBasin::new()
        .storm_rate(&0.3)? // storms roughly every three days
        .storm_depth(0.002, 0.02)
        .et_coeff(0.01)
        .drain_coeff(0.05);
    let mut rng = rand::thread_rng();
    let mut mass = MassBalance::new(basin.storage());

    let start = NaiveDate::from_ymd_opt(2020, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut records = Vec::with_capacity(365);
    for day in 0..365 {
        let totals = basin.step(&mut rng);
        records.push(mass.step(start + Duration::days(day), &totals));
    }

    let mut wtr = BalanceWriter::new(File::create("balance.txt")?);
    wtr.header()?;
    for rec in &records {
        wtr.write_record(rec)?;
    }
    let mut sink = wtr.into_inner()?;
    report::write_summary(&mut sink, &mass.summary())?;

    BalanceRecord::record(&mut records, "balance.csv")?;
    plot::error_series(&records, "balance_error.png")?;
    plot::cum_series(&records, "balance_cum.png")?;

    let closure = mass.summary();
    log::info!(
        "water year closed with residual {:e} m over {} steps",
        closure.residual,
        records.len()
    );
    Ok(())
}
