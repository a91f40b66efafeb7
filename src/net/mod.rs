//! Canonical network identity types shared by the classifier, flow table,
//! sampler and renderer.

mod endpoint;

pub use endpoint::{Endpoint, FlowKey, Protocol};
