//! Database configuration.

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether every commit is made durable before it returns.
    ///
    /// When false, commits are persisted lazily and a crash may lose the
    /// most recent transactions (never corrupt older ones).
    pub sync_on_commit: bool,

    /// Page cache size in bytes. `None` uses the engine default.
    pub cache_size: Option<usize>,

    /// Buckets created (if absent) when the database is opened.
    pub buckets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            sync_on_commit: true,
            cache_size: None,
            buckets: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync on every commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets the page cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Replaces the list of buckets provisioned at open.
    #[must_use]
    pub fn buckets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one bucket to the provisioning list.
    #[must_use]
    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.buckets.push(name.into());
        self
    }

    pub(crate) fn durability(&self) -> redb::Durability {
        if self.sync_on_commit {
            redb::Durability::Immediate
        } else {
            redb::Durability::Eventual
        }
    }
}
