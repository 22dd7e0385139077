pub mod classifier;
pub mod event;
pub mod feed;
pub mod gesture;
pub mod history;
pub mod listening;
pub mod overload;
pub mod reactor;
pub mod scheduler;
pub mod state;
pub mod stress;
pub mod telemetry;
pub mod time;
pub mod travel;
pub mod view;
