use std::path::PathBuf;

pub fn default_entry() -> PathBuf {
    PathBuf::from("src/index.tsx")
}

pub fn default_stylesheet() -> PathBuf {
    PathBuf::from("src/styles/global.css")
}

pub fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_entry_marker() -> String {
    "index".to_string()
}

pub fn default_stylesheet_path() -> String {
    beacon_bundler::options::DEFAULT_STYLESHEET_PATH.to_string()
}

pub fn default_minify() -> bool {
    true
}

pub fn default_css_timeout_secs() -> u64 {
    beacon_bundler::options::DEFAULT_CSS_TIMEOUT_SECS
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_admin_prefix() -> String {
    "/admin".to_string()
}

pub fn default_ws_path() -> String {
    "/ws".to_string()
}

pub fn default_server_name() -> String {
    "Beacon".to_string()
}
