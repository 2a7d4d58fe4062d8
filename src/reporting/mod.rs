pub mod reporter;

pub use reporter::StatisticsReport;
