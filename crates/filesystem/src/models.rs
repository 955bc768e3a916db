/// File helpers used by the binary
pub struct FileSystem;
