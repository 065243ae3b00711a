//! Download source implementations
//!
//! Each provider shape lives in its own file: the redirect-resolving
//! authenticated source and the direct streaming source.

pub mod civitai;
pub mod direct;

pub use civitai::CivitaiSource;
pub use direct::DirectSource;
