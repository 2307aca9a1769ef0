pub mod series;
pub mod summary;

pub use series::{
    DEFAULT_DAILY_WINDOW, DEFAULT_MONTHLY_WINDOW, SeriesPoint, bucket_daily, bucket_monthly,
};
pub use summary::{RECENT_LIMIT, Summary, summarize};
