pub mod pager;
pub mod year_chunker;
