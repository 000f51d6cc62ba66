pub const APP_NAME: &str = "OathPlate Calculator";
pub const APP_BIN: &str = "oathplate-calc";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

/// `v1.2.3`, preferring the git tag captured at build time.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// Default User-Agent; the prices API asks clients to identify themselves.
pub fn default_user_agent() -> String {
    format!("{}/{} (crafting profit dashboard)", APP_BIN, version_label())
}
