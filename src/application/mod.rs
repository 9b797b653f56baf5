pub mod capture_coordinator;
pub mod download;

pub use capture_coordinator::CaptureCoordinator;
pub use download::{AnyTrigger, DialogTrigger, DirectoryTrigger, DownloadTrigger};
