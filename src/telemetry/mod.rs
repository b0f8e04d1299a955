//! Snapshot wire model, link health, feed transport, and the update
//! pipeline.

pub mod feed;
pub mod health;
pub mod pipeline;
pub mod snapshot;

pub use feed::{spawn_dummy_feed, spawn_tcp_feed, DummyFeed, FeedMessage};
pub use health::{heading_allowed, link_status, LinkStatus};
pub use pipeline::{FrameSink, PipelineStats, RenderFrame, UpdatePipeline};
pub use snapshot::{Constellation, Snapshot};
