use crate::model::{IndicatorSeries, PricePoint, RenderError};
use chrono::Utc;
use plotters::prelude::*;
use std::fs;

pub trait ChartRenderer: Send + Sync {
    /// PNG bytes of the price line with the SMA overlay.
    fn render(&self, series: &[PricePoint], indicators: &IndicatorSeries, label: &str) -> Result<Vec<u8>, RenderError>;
}

pub struct PlottersChart {
    pub width: u32,
    pub height: u32,
    pub hours: u32,
}

impl PlottersChart {
    pub fn new(lookback_days: u32) -> Self {
        Self {
            width: 800,
            height: 360,
            hours: lookback_days * 24,
        }
    }

    fn draw(
        &self,
        path: &std::path::Path,
        series: &[PricePoint],
        indicators: &IndicatorSeries,
        label: &str,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let sma_points: Vec<(chrono::DateTime<Utc>, f64)> = series
            .iter()
            .zip(indicators.sma.iter())
            .filter_map(|(p, sma)| sma.map(|v| (p.timestamp, v)))
            .collect();

        let (min_price, max_price) = series
            .iter()
            .map(|p| p.price)
            .chain(sma_points.iter().map(|(_, v)| *v))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let padding = (max_price - min_price).max(1e-8) * 0.1;
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;

        let x_min = series[0].timestamp;
        let x_max = series[series.len() - 1].timestamp;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} - last {}h", label, self.hours), ("sans-serif", 22).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("USD")
            .x_label_formatter(&|ts: &chrono::DateTime<Utc>| ts.format("%d %H:%M").to_string())
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(LineSeries::new(series.iter().map(|p| (p.timestamp, p.price)), &BLUE))
            .map_err(drawing)?
            .label("Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        if !sma_points.is_empty() {
            chart
                .draw_series(LineSeries::new(sma_points, &RED))
                .map_err(drawing)?
                .label("SMA20")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }
}

impl ChartRenderer for PlottersChart {
    fn render(&self, series: &[PricePoint], indicators: &IndicatorSeries, label: &str) -> Result<Vec<u8>, RenderError> {
        if series.len() < 2 || series[0].timestamp >= series[series.len() - 1].timestamp {
            return Err(RenderError::NotEnoughData(series.len()));
        }

        // BitMapBackend encodes PNG only when writing to a path
        let path = std::env::temp_dir().join(format!(
            "coin_pulse_{}_{}.png",
            label.to_lowercase(),
            Utc::now().timestamp_millis()
        ));

        let drawn = self.draw(&path, series, indicators, label);
        let bytes = drawn.and_then(|_| fs::read(&path).map_err(RenderError::from));
        let _ = fs::remove_file(&path);
        bytes
    }
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_single_point_is_not_drawable() {
        let point = PricePoint {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            price: 1.0,
        };
        let chart = PlottersChart::new(2);
        let err = chart.render(&[point], &IndicatorSeries::default(), "BTC").unwrap_err();
        assert!(matches!(err, RenderError::NotEnoughData(1)));
    }

    #[test]
    fn test_hours_follow_lookback() {
        assert_eq!(PlottersChart::new(2).hours, 48);
        assert_eq!(PlottersChart::new(3).hours, 72);
    }

    #[test]
    fn test_same_timestamp_series_is_rejected() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let series = vec![
            PricePoint { timestamp: at, price: 1.0 },
            PricePoint { timestamp: at, price: 2.0 },
        ];
        assert!(PlottersChart::new(2).render(&series, &IndicatorSeries::default(), "ETH").is_err());
    }
}
