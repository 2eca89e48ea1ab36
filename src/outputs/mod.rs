//! Output writers.
//!
//! - [`json`]: writes one day's articles for one source as a JSON file
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── interfax_Mon Jan 01 2024.json
//! ├── interfax_Sun Dec 31 2023.json
//! ├── rbc_Mon Jan 01 2024.json
//! └── rbc_Sun Dec 31 2023.json
//! ```
//!
//! A file's presence is the only record that a day was harvested.

pub mod json;
