use super::*;

fn clear_env() {
    for key in ["HOSPSIM_BIND", "HOSPSIM_PORT", "HOSPSIM_DATA_DIR", "HOSPSIM_STATIC_DIR"] {
        std::env::remove_var(key);
    }
}

// Single test so the env mutations cannot race each other.
#[test]
fn from_env_defaults_and_overrides() {
    clear_env();
    assert_eq!(AppConfig::from_env(), AppConfig::default());

    std::env::set_var("HOSPSIM_PORT", "9090");
    std::env::set_var("HOSPSIM_DATA_DIR", "/tmp/hospsim");
    std::env::set_var("HOSPSIM_BIND", "  ");
    let cfg = AppConfig::from_env();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/hospsim"));
    assert_eq!(cfg.bind, DEFAULT_BIND);

    std::env::set_var("HOSPSIM_PORT", "not-a-port");
    assert_eq!(AppConfig::from_env().port, DEFAULT_PORT);

    let cfg = AppConfig::from_env().with_overrides(Some(7000), Some(PathBuf::from("elsewhere")));
    assert_eq!(cfg.port, 7000);
    assert_eq!(cfg.data_dir, PathBuf::from("elsewhere"));

    clear_env();
}
