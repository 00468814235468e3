mod forecast_worker;

pub use forecast_worker::ForecastWorker;
