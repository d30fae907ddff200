pub mod frame;
pub mod mock;
pub mod session;
pub mod supervisor;

pub use frame::FrameDecoder;
pub use session::{EventStream, SessionConfig, StreamSession};
pub use supervisor::{ReconnectSupervisor, RetryConfig, SupervisorState};
