//! Consumer side of the resume feed: page accumulation and the HTTP source.

pub mod http;
pub mod pager;

pub use http::{ClientError, ResumeClient};
pub use pager::{PageSource, PagerState, ResumePager};
