/// CSV export of analysed trendlines.
pub mod export;
