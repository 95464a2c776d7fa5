pub mod archive;
pub mod cli;
pub mod ctx;
pub mod error;
pub mod io;
pub mod math;
pub mod molecule;
pub mod pipeline;
pub mod schema;
pub mod segments;
pub mod source;
pub mod table;
