use std::fs;

use combat_content::ContentRegistry;
use tempfile::TempDir;

fn write_pack(profiles: &str, archetypes: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("profiles.ron"), profiles).unwrap();
    fs::write(dir.path().join("archetypes.toml"), archetypes).unwrap();
    dir
}

const PROFILES: &str = r#"{
    "turtle": (attack: 0.1, block: 1.0, dodge: 0.5, ranged_attack: 0.0, ultimate_attack: 0.0),
}"#;

#[test]
fn loads_pack_from_directory() {
    let dir = write_pack(
        PROFILES,
        r#"
        [archetypes.wall]
        profile = "turtle"
        max_health = 300.0
        "#,
    );

    let content = ContentRegistry::load(dir.path()).unwrap();

    assert_eq!(content.profile("turtle").unwrap().block, 1.0);
    let wall = content.archetype("wall").unwrap();
    assert_eq!(wall.config.max_health, 300.0);
    assert_eq!(wall.profile.attack, 0.1);
}

#[test]
fn unknown_profile_reference_is_rejected() {
    let dir = write_pack(
        PROFILES,
        r#"
        [archetypes.ghost]
        profile = "missing"
        "#,
    );

    let err = ContentRegistry::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("unknown profile 'missing'"), "{err}");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("profiles.ron"), PROFILES).unwrap();

    let err = ContentRegistry::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("archetypes.toml"), "{err}");
}

#[test]
fn malformed_ron_names_the_path() {
    let dir = write_pack("{ \"turtle\": (attack: ", "");

    let err = ContentRegistry::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("profiles.ron"), "{err}");
}
