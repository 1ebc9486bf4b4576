//! Civic Domain Layer
//!
//! This crate contains the data model shared by every other civic crate and
//! the trait interfaces the infrastructure layers implement. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Source**: one external, independently failing data provider
//!   (weather forecast, metropolitan open data, train operation status)
//! - **SourceResult**: what an adapter hands back; always carries a payload,
//!   `succeeded` only records provenance
//! - **AggregatedContext**: every source result gathered for one user turn
//! - **GenerationOutcome**: the text of one generation pass, failed or not
//! - **PipelineResult**: the single object returned for one chat turn, on the
//!   normal path and on the repair path alike
//!
//! ## Architecture
//!
//! - Pure data and lookup tables only
//! - `DataSource` and `TextGenerator` are the seams the adapter and LLM crates
//!   plug into
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod generation;
pub mod lookup;
pub mod payload;
pub mod result;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use context::AggregatedContext;
pub use generation::GenerationOutcome;
pub use lookup::{Area, Dataset, Region};
pub use payload::{
    DailyForecast, DatasetItem, DelayEntry, FacilityItem, Forecast, LineStatus, RealTimeData,
    RegionalDataset, SourcePayload, Temperature, TemperatureRange, TransportStatus, WeatherReport,
};
pub use result::{AgentTrace, PipelineResult};
pub use source::{RegionalParams, SourceId, SourceParams, SourceResult, TransportParams, WeatherParams};
pub use traits::{DataSource, TextGenerator};
