pub mod charts;
pub mod excel;
pub mod palette;
pub mod pdf;
