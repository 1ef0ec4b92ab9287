//! Record, category and date-window models consumed by the analytics engines.

pub mod calendar;
pub mod category;
pub mod filter;
pub mod record;
pub mod window;

pub use calendar::DayCountPolicy;
pub use category::Category;
pub use filter::RecordFilter;
pub use record::{MonetaryRecord, RecordKind};
pub use window::{AmountRange, DateWindow};
