//! Frame capture: the packet source contract, a concrete `pnet`-backed
//! implementation, and the classifier that turns frames into flow updates.

pub mod classifier;
pub mod pnet_source;
pub mod source;

pub use classifier::classify;
pub use pnet_source::PnetSource;
pub use source::{FrameSource, LinkType, LocalAddresses, RawFrame};
