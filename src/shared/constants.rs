/// Maximum number of items a list endpoint returns when a limit is given
pub const MAX_LIST_LIMIT: i64 = 100;
