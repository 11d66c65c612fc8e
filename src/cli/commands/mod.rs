//! CLI command implementations

pub mod cache;
pub mod config;
pub mod entry;
pub mod generate;
pub mod handles;
pub mod init;
pub mod render;

pub use cache::execute as cache;
pub use config::execute as config;
pub use entry::execute as entry;
pub use generate::execute as generate;
pub use handles::execute as handles;
pub use init::execute as init;
pub use render::execute as render;
