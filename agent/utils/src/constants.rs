use log::LevelFilter;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_AGENT_LEVEL_FILTER: LevelFilter = LevelFilter::Info;
pub const DEFAULT_ASSUME_ROLE_SESSION_DURATION: i32 = 3600;
/// The session name used when a reconciler assumes a role.
pub const ASSUME_ROLE_SESSION_NAME: &str = "resource-reconciler";
/// The number of attempts the AWS SDK makes for a single call before giving up.
pub const SDK_MAX_ATTEMPTS: u32 = 15;
