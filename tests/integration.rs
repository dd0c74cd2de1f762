use commented_config::encode::comment_index;
use commented_config::file::{ConfigError, ConfigFileHelper, FormatOptions};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_title_and_sub_comments() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  fs::write(&path, "# Title\nkey: 1\n# Sub\nother: 2\n").unwrap();

  let encoded = ConfigFileHelper::read_encoded(&path).unwrap();
  let indices: Vec<usize> = encoded
    .text
    .lines()
    .filter_map(|line| line.split_once(':'))
    .filter_map(|(key, _)| comment_index(key.trim()))
    .collect();
  assert_eq!(indices, vec![0, 1]);

  let document = ConfigFileHelper::load(&path).unwrap();
  assert_eq!(document.comment_count(), 2);
  assert_eq!(document.comments(), vec![" Title", " Sub"]);

  ConfigFileHelper::save_document(&document, false).unwrap();

  let saved = fs::read_to_string(&path).unwrap();
  assert_eq!(saved, "# Title\nkey: 1\n\n# Sub\nother: 2\n");
}

#[test]
fn test_nested_config_roundtrip() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  let content = "# Server settings
server:
  # Port to bind
  port: 8080
  host: localhost
# it's the name
name: app
";
  fs::write(&path, content).unwrap();

  let options = FormatOptions {
    path: path.clone(),
    compact: false,
  };
  let document = ConfigFileHelper::format_with_options(options).unwrap();
  assert_eq!(document.comment_count(), 3);
  assert_eq!(
    document.get("server.port").and_then(|port| port.as_u64()),
    Some(8080)
  );

  let expected = "# Server settings
server:

  # Port to bind
  port: 8080
  host: localhost

# it's the name
name: app
";
  let saved = fs::read_to_string(&path).unwrap();
  assert_eq!(saved, expected);

  // a second cycle leaves the file alone
  let document = ConfigFileHelper::load(&path).unwrap();
  ConfigFileHelper::save_document(&document, false).unwrap();
  assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_compact_save() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  let content = "# Title\nkey: 1\n\n\n# Sub\nother: 2\n";
  fs::write(&path, content).unwrap();

  let options = FormatOptions {
    path: path.clone(),
    compact: true,
  };
  ConfigFileHelper::format_with_options(options).unwrap();

  let saved = fs::read_to_string(&path).unwrap();
  assert_eq!(saved, "# Title\nkey: 1\n# Sub\nother: 2\n");
}

#[test]
fn test_list_stays_compact() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  let content = "# Hosts\nhosts:\n- alpha\n- beta\nretries: 3\n";
  fs::write(&path, content).unwrap();

  let document = ConfigFileHelper::load(&path).unwrap();
  ConfigFileHelper::save_document(&document, false).unwrap();

  assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_edits_and_new_comments() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  fs::write(&path, "key: 1\n").unwrap();

  let mut document = ConfigFileHelper::load(&path).unwrap();
  document.set("server.port", 9000).unwrap();
  document.add_comments(["added later"]);
  ConfigFileHelper::save_document(&document, false).unwrap();

  let saved = fs::read_to_string(&path).unwrap();
  assert_eq!(saved, "key: 1\nserver:\n  port: 9000\n\n# added later\n");
  assert!(!saved.contains("_COMMENT_"));

  let document = ConfigFileHelper::load(&path).unwrap();
  assert_eq!(document.comment_count(), 1);
}

#[test]
fn test_missing_file_is_created() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("nested").join("missing.yml");

  let document = ConfigFileHelper::load(&path).unwrap();

  assert_eq!(document.comment_count(), 0);
  assert!(path.is_file());
  assert_eq!(fs::read_to_string(&path).unwrap(), "");

  ConfigFileHelper::save_document(&document, false).unwrap();
  assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_directory_is_rejected() {
  let temp_dir = TempDir::new().unwrap();

  match ConfigFileHelper::load(temp_dir.path()).unwrap_err() {
    ConfigError::IsDirectory(path) => assert_eq!(path, temp_dir.path()),
    err => panic!("Expected IsDirectory error, got {err}"),
  }
}

#[test]
fn test_unreadable_file_is_an_error() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  fs::write(&path, [0x6b, 0x3a, 0x20, 0xff, 0xfe, 0x0a]).unwrap();

  assert!(matches!(
    ConfigFileHelper::load(&path),
    Err(ConfigError::Read(_))
  ));
}

#[test]
fn test_invalid_yaml_leaves_file_untouched() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  let content = "# broken\nkey: [unclosed\n";
  fs::write(&path, content).unwrap();

  assert!(matches!(
    ConfigFileHelper::load(&path),
    Err(ConfigError::Parse(_))
  ));
  assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_save_into_missing_directory_fails() {
  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("absent").join("config.yml");

  let result = ConfigFileHelper::save("key: 1\n", &path, false);

  assert!(matches!(result, Err(ConfigError::Write(_))));
  assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn test_save_through_symlink_updates_target() {
  use std::os::unix::fs::symlink;

  let temp_dir = TempDir::new().unwrap();
  let real_path = temp_dir.path().join("real.yml");
  let link_path = temp_dir.path().join("config.yml");

  fs::write(&real_path, "# Title\nkey: 1\n# Sub\nother: 2\n").unwrap();
  symlink(&real_path, &link_path).unwrap();

  let mut document = ConfigFileHelper::load(&link_path).unwrap();
  document.set("key", 5).unwrap();
  ConfigFileHelper::save_document(&document, false).unwrap();

  assert!(fs::symlink_metadata(&link_path).unwrap().file_type().is_symlink());
  assert_eq!(
    fs::read_to_string(&real_path).unwrap(),
    "# Title\nkey: 5\n\n# Sub\nother: 2\n"
  );
  assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}

#[cfg(unix)]
#[test]
fn test_save_keeps_permissions() {
  use std::os::unix::fs::PermissionsExt;

  let temp_dir = TempDir::new().unwrap();
  let path = temp_dir.path().join("config.yml");

  fs::write(&path, "# Secret\ntoken: abc\n").unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

  let document = ConfigFileHelper::load(&path).unwrap();
  ConfigFileHelper::save_document(&document, false).unwrap();

  let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
  assert_eq!(mode, 0o600);
  assert_eq!(fs::read_to_string(&path).unwrap(), "# Secret\ntoken: abc\n");
}
