//! Report delivery: scheduling on the host executor, the bounded work
//! queue, delivery clients and the controller tying them together.

pub mod client;
pub mod controller;
pub mod queue;
pub mod scheduler;

pub use client::{ClientFactory, FileWritingClient, MultiClient, TransportFactory};
pub use controller::{
    ControllerFactory, ControllerParts, DeliveryController, ReportController,
    ReportControllerFactory,
};
pub use queue::WorkQueue;
pub use scheduler::{InsightsScheduler, ScheduledTask};
