pub mod bprs;
pub mod cgi;
pub mod gaf;
pub mod hama;
pub mod hamd;
pub mod madrs;
pub mod panss;
pub mod ymrs;
