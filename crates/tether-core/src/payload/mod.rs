//! Payload and data-carrier handle types.
//!
//! These are the concrete types that flow through the callback layer and
//! the engine seam: byte buffers, encodings, samples, queries, replies and
//! discovery results. Each implements [`Resource`](crate::handle::Resource)
//! once, making it a full member of the handle family.

mod bytes;
mod encoding;
mod id;
mod query;
mod sample;
mod scouting;
mod slice_map;

pub use bytes::{Bytes, BytesReader};
pub use encoding::{Encoding, EncodingPrefix};
pub use id::{PeerId, Timestamp};
pub use query::{Query, Reply, ReplyError};
pub use sample::{Sample, SampleKind};
pub use scouting::{Hello, WhatAmI};
pub use slice_map::SliceMap;
