pub mod limits {

    /// Reading history rows returned per key
    pub const HISTORY_LIMIT: u64 = 20;

    /// Public comments returned per comic
    pub const COMMENTS_LIMIT: u64 = 50;

    /// Rows in each "top N" statistics list
    pub const TOP_N: u64 = 10;
}

pub mod keys {

    pub const DEFAULT_BULK_COUNT: u32 = 10;

    pub const DEFAULT_BULK_PREFIX: &str = "KEY";

    /// Upper bound for a single bulk request
    pub const MAX_BULK_COUNT: u32 = 1000;

    /// Longest validity one grant or extension may add (100 years)
    pub const MAX_VALIDITY_DAYS: i64 = 36_500;
}

pub mod headers {

    /// Carries the access-key id returned by unlock
    pub const KEY_ID: &str = "x-key-id";
}
