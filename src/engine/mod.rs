mod forecast_engine;
#[cfg(test)]
mod tests;

pub use forecast_engine::ForecastEngine;
