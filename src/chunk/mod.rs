// ABOUTME: Ordered asynchronous output composition module
// ABOUTME: Exposes the allocate-then-fill chunk scheduler used as the helper output sink

pub mod scheduler;

pub use scheduler::ChunkScheduler;
