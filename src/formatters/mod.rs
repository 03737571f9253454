mod filler;
mod summary;

pub use filler::FillerFormatter;
pub use summary::SummaryFormatter;
