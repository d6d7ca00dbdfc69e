use super::*;
use pretty_assertions::assert_eq;

#[test]
fn defaults() {
    let config = WeaveConfig::default();
    assert!(config.signals);
    assert_eq!(config.unwritable, UnwritablePolicy::Skip);
    assert_eq!(WeaveConfig::from_vars(None, None), config);
}

#[test]
fn parse_policy() {
    assert_eq!(UnwritablePolicy::parse("skip"), Some(UnwritablePolicy::Skip));
    assert_eq!(UnwritablePolicy::parse(" Warn "), Some(UnwritablePolicy::Warn));
    assert_eq!(UnwritablePolicy::parse("ERROR"), Some(UnwritablePolicy::Error));
    assert_eq!(UnwritablePolicy::parse("panic"), None);
}

#[test]
fn vars_override_defaults() {
    let config = WeaveConfig::from_vars(Some("error"), Some("off"));
    assert_eq!(
        config,
        WeaveConfig {
            signals: false,
            unwritable: UnwritablePolicy::Error,
        }
    );
}

#[test]
fn unknown_values_keep_defaults() {
    let config = WeaveConfig::from_vars(Some("loud"), Some("yes"));
    assert_eq!(config, WeaveConfig::default());

    for off in ["0", "off", "False", "no"] {
        assert!(!WeaveConfig::from_vars(None, Some(off)).signals, "{off}");
    }
}

#[test]
fn builders() {
    let config = WeaveConfig::default()
        .with_signals(false)
        .with_unwritable(UnwritablePolicy::Warn);
    assert!(!config.signals);
    assert_eq!(config.unwritable, UnwritablePolicy::Warn);
}
