//! HTTP control surface over the simulator core.

mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::SimulatorAdapter;

mod http;
pub use http::HttpApi;

pub use axum;
