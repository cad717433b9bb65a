// Request construction module.
// Descriptor state, payload serialization, signing, and final assembly.

pub mod builder;
pub mod descriptor;
pub mod payload;
pub mod signature;

pub use builder::{BuiltRequest, RequestBuilder};
pub use descriptor::RequestDescriptor;
pub use payload::{PayloadFormat, PayloadSerializer, RequestPayload};
