//! Mock implementations for flow testing
//!
//! Stand-ins for the Telegram transport and the ffmpeg engine, so the upload
//! flow can be driven without network access or an ffmpeg binary.

pub mod mock_engine;
pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_engine::{EngineBehavior, MockEngine};
#[allow(unused_imports)]
pub use mock_transport::{MockTransport, TransportCall};
