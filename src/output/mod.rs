//! Output formatters for duplicate scan results.
//!
//! - Text for people ([`TextOutput`])
//! - JSON for automation and scripting ([`JsonOutput`])
//!
//! # Example
//!
//! ```no_run
//! use dupehash::duplicates::DuplicateFinder;
//! use dupehash::error::ExitCode;
//! use dupehash::output::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&report, ExitCode::for_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
