//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn url() -> Option<String> {
        None
    }

    pub fn page_size() -> i64 {
        10
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "posts".into()
    }

    pub fn document() -> String {
        "index.md".into()
    }

    pub fn media_path() -> String {
        "/posts/{slug}/media/".into()
    }

    pub mod s3 {
        pub fn region() -> String {
            "us-east-1".into()
        }
    }
}

// ============================================================================
// [refresh] Section Defaults
// ============================================================================

pub mod refresh {
    pub fn interval_minutes() -> i64 {
        0
    }
}
