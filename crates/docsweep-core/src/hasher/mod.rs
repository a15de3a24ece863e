pub mod prefix;

pub use prefix::Fingerprinter;
