//! Shared integration test helpers.

pub mod common {
    pub mod mock_feed;
}
