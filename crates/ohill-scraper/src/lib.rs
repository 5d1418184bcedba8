pub mod builder;
pub mod client;
pub mod dump;
pub mod error;
pub mod extract;
pub mod merge;
pub mod resolve;
pub mod types;

pub use builder::MenuBuilder;
pub use client::{normalize_api_payload, CampusDishClient};
pub use dump::{collect_raw_dump, write_raw_dump, PeriodDump, RawDump};
pub use error::ScraperError;
pub use extract::{extract_braced_object, find_model_token, parse_model};
pub use merge::{MenuAccumulator, MergedItem, PeriodMerger};
pub use resolve::{base_model_info, declared_periods, menu_section};
pub use types::{BaseModelInfo, MenuPeriod, PayloadSource};
