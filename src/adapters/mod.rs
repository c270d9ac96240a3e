pub mod archive;
pub mod fs;
pub mod legacy;
