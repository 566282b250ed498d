//! Common utilities for the Wallaby headless browser.
//!
//! This crate provides shared infrastructure used by the browser session
//! and front ends:
//! - **HTTP Fetch** - blocking page retrieval with a browser User-Agent
//! - **URL Resolution** - resolving relative link targets against a page URL
//! - **Warning System** - deduplicated terminal output for tolerated markup
//!   problems and unsupported features

pub mod net;
pub mod url;
pub mod warning;
