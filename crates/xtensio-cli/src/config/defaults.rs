/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "xtensio.config.json";

/// File name of the assembled configuration handed to the bundler.
pub const BUNDLER_CONFIG_FILE: &str = "bundler.config.json";

pub const DEFAULT_ARTIFACTS_DIR: &str = "zips";

/// Placeholder in the bundler command replaced by the config path.
pub const CONFIG_PLACEHOLDER: &str = "{config}";

pub fn default_compiler() -> Vec<String> {
    vec!["npx".to_string(), "tsc".to_string()]
}

pub fn default_node() -> String {
    "node".to_string()
}

pub fn default_bundler() -> Vec<String> {
    ["npx", "xtensio-bundle", "--config", CONFIG_PLACEHOLDER]
        .map(String::from)
        .to_vec()
}

pub fn default_packager() -> Vec<String> {
    vec!["npx".to_string(), "web-ext".to_string()]
}
