//! Unit tests for GitHub identifiers, tokens, and pagination state.

mod locator;
mod page_info;
