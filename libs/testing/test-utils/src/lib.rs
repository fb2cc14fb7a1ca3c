//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated SQLite database, in memory or on disk
//! - `TestDataBuilder`: deterministic test data derived from the test name
//! - `assertions`: small assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_repository_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_repository_test");
//!
//!     let email = builder.email("alice");
//!     let password = builder.password();
//! }
//! ```

mod sqlite;

pub use sqlite::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_register_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Public user identifier, unique per builder and label.
    pub fn user_id(&self, label: &str) -> String {
        format!("usr-{:016x}-{}", self.seed, label)
    }

    /// Email address unique per builder and local part
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(255);
    /// assert_eq!(builder.email("bob"), "bob.ff@example.test");
    /// ```
    pub fn email(&self, local: &str) -> String {
        format!("{}.{:x}@example.test", local, self.seed)
    }

    /// A password that passes registration validation.
    pub fn password(&self) -> String {
        format!("pw-{:016x}", self.seed)
    }

    pub fn nickname(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.seed % 10_000)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a string is not a plaintext echo of a secret
    pub fn assert_not_plaintext(stored: &str, secret: &str, context: &str) {
        assert_ne!(stored, secret, "{}: secret stored in plaintext", context);
        assert!(
            !stored.contains(secret),
            "{}: stored value embeds the secret",
            context
        );
    }
}
