//! Auxiliary filesystem operations that don't fit a larger component:
//! checksums, disk-usage reports, and in-workspace symlink creation (§4.G).

pub mod checksum;
pub mod disk_usage;
pub mod symlink;

pub use checksum::{compute_checksum, verify_checksum, ChecksumAlgorithm};
pub use disk_usage::{analyze_disk_usage, DiskUsageReport};
pub use symlink::create_symlink;
