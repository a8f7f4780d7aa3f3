pub mod gaf;
pub mod history;
pub mod imaging;
pub mod observation;
pub mod parameters;
pub mod plan;
pub mod result;
pub mod treatment;
