mod dataset;
mod ip;
mod record;
mod source;

pub use dataset::*;
pub use ip::*;
pub use record::*;
pub use source::*;
