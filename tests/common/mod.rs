//! Common test utilities for video-batch-dl integration tests

#[allow(dead_code)]
pub mod assertions;
#[allow(dead_code)]
pub mod fake_ytdlp;
#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod mock_tool;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fake_ytdlp::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_tool::*;
