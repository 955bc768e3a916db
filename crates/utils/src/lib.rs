pub mod checksum;
pub mod urls;
pub mod errors;

pub use checksum::*;
pub use urls::*;
pub use errors::*;
