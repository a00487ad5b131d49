pub mod enums;
pub mod medical_record;
pub mod patient;

pub use enums::*;
pub use medical_record::*;
pub use patient::*;
