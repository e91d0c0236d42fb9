/// Year reported by the catalog when it holds no dated films.
pub const FALLBACK_RELEASE_YEAR: i32 = 2006;

pub mod limits {

    pub const PAGE_SIZE: u64 = 10;

    pub const MIN_KEYWORD_LEN: usize = 2;

    pub const DEFAULT_STATS_LIMIT: usize = 5;

    pub const DEFAULT_HISTORY_LIMIT: usize = 20;
}

pub mod env {

    pub const MYSQL_HOST: &str = "MYSQL_HOST";

    pub const MYSQL_PORT: &str = "MYSQL_PORT";

    pub const MYSQL_USER: &str = "MYSQL_USER";

    pub const MYSQL_PASSWORD: &str = "MYSQL_PASSWORD";

    pub const MYSQL_DATABASE: &str = "MYSQL_DATABASE";

    pub const MONGO_URI: &str = "MONGO_URI";

    pub const MONGO_DATABASE: &str = "MONGO_DATABASE";

    pub const MONGO_COLLECTION: &str = "MONGO_COLLECTION";
}
