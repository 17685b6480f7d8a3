use pretty_assertions::assert_eq;
use rstest::rstest;
use svclog_fs::{ConfigDir, ConfigFile, ConfigPath};

#[rstest]
#[case("/etc/svc/app.yml", "/etc/svc")]
#[case("/etc/svc/", "/etc/svc")]
#[case("/etc//svc//app.yml", "/etc//svc")]
#[case("conf/app.yml", "conf")]
#[case("app.yml", ".")]
#[case("", ".")]
#[case("/app.yml", "/")]
#[case("/", "/")]
#[case("conf\\nested\\app.yml", "conf/nested")]
fn hint_directory(#[case] hint: &str, #[case] expected: &str) {
    let dir = ConfigDir::from_hint(hint);
    assert_eq!(dir.dir().as_str(), expected);
}

#[test]
fn hint_file_name_is_ignored() {
    let a = ConfigDir::from_hint("/srv/app/config.yml");
    let b = ConfigDir::from_hint("/srv/app/does-not-matter.json");
    assert_eq!(a, b);
}

#[test]
fn relative_hint_resolves_against_current_directory() {
    let dir = ConfigDir::from_hint("service.yml");
    assert_eq!(dir.default_file().as_str(), "./config.logger.yml");
}

#[test]
fn explicit_directory_is_kept() {
    let dir = ConfigDir::new("/srv/app");
    assert_eq!(
        dir.file(ConfigFile::Override),
        ConfigPath::new("/srv/app/config.logger.override.yml")
    );
}

#[test]
fn exists_false_for_nonexistent() {
    let path = ConfigPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
    assert!(!path.is_file());
}

#[test]
fn is_file_distinguishes_directories() {
    let temp = tempfile::tempdir().unwrap();
    let dir = ConfigPath::new(temp.path());
    let file = dir.child(ConfigFile::Default.as_str());
    std::fs::write(&file, "engine: {}\n").unwrap();

    assert!(dir.exists());
    assert!(!dir.is_file());
    assert!(file.is_file());
}

#[cfg(unix)]
#[test]
fn dangling_link_does_not_exist() {
    let temp = tempfile::tempdir().unwrap();
    let link = temp.path().join("config.logger.override.yml");
    std::os::unix::fs::symlink(temp.path().join("gone.yml"), &link).unwrap();

    assert!(!ConfigPath::new(&link).exists());
}
