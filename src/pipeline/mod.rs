//! Pipeline orchestration
//!
//! [`Pipeline`] wires a [`Preprocessor`](crate::preprocessing::Preprocessor)
//! and a model together for one train/predict lifecycle. [`SessionSlot`]
//! keeps the latest trained pipeline available to concurrent callers.

mod engine;
mod session;

pub use engine::{ChartPoint, Pipeline, TrainReport};
pub use session::{Session, SessionSlot};
