//! Diagnostic charts for balance records.
use crate::balance::BalanceRecord;
use plotters::prelude::*;

/// Plot the per-step mass-balance residual against timestep number.
pub fn error_series(
    recs: &[BalanceRecord],
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if recs.is_empty() {
        return Ok(());
    }
    let pts: Vec<(f64, f64)> = recs
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.error))
        .collect();
    let mut ymin = pts.iter().map(|xi| xi.1).fold(f64::INFINITY, f64::min);
    let mut ymax = pts.iter().map(|xi| xi.1).fold(f64::NEG_INFINITY, f64::max);
    if ymax - ymin < 1e-12 {
        ymin -= 1e-9;
        ymax += 1e-9;
    }
    let xmax = pts.len() as f64;
    let root = BitMapBackend::new(title, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    root.margin(10, 10, 10, 10);
    // construct a chart context
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .x_labels(5)
        .y_labels(5)
        .y_label_formatter(&|x| format!("{:.1e}", x))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("Timestep")
        .y_desc("Mass balance error (m)")
        .draw()?;

    chart.draw_series(LineSeries::new(pts, &BLACK))?;
    Ok(())
}

/// Plot cumulative inflow, outflow, and storage change over the run.
pub fn cum_series(recs: &[BalanceRecord], title: &str) -> Result<(), Box<dyn std::error::Error>> {
    if recs.is_empty() {
        return Ok(());
    }
    let start = recs[0].storage;
    let mut inflow = 0.0;
    let mut outflow = 0.0;
    let mut ins = Vec::with_capacity(recs.len());
    let mut outs = Vec::with_capacity(recs.len());
    let mut stores = Vec::with_capacity(recs.len());
    for (i, r) in recs.iter().enumerate() {
        inflow += r.precipitation + r.snow_vapor_flux + r.canopy_vapor_flux + r.culvert_return_flow;
        outflow += r.channel_interception + r.road_interception + r.evapotranspiration;
        ins.push((i as f64, inflow));
        outs.push((i as f64, outflow));
        stores.push((i as f64, r.storage - start));
    }

    let all = ins.iter().chain(outs.iter()).chain(stores.iter());
    let mut ymin = all.clone().map(|xi| xi.1).fold(f64::INFINITY, f64::min);
    let mut ymax = all.map(|xi| xi.1).fold(f64::NEG_INFINITY, f64::max);
    if ymax - ymin < 1e-12 {
        ymin -= 1e-9;
        ymax += 1e-9;
    }
    let xmax = recs.len() as f64;
    let root = BitMapBackend::new(title, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    root.margin(10, 10, 10, 10);
    // construct a chart context
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .x_labels(5)
        .y_labels(5)
        .y_label_formatter(&|x| format!("{:.3}", x))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("Timestep")
        .y_desc("Cumulative depth (m)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(ins, &BLUE))?
        .label("inflow")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(LineSeries::new(outs, &GREEN))?
        .label("outflow")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));
    chart
        .draw_series(LineSeries::new(stores, &RED))?
        .label("storage change")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .draw()?;
    Ok(())
}
