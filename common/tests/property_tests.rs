// Property-based tests for common module

use common::config::{AppEnvironment, LogFormat, Settings};
use common::models::{
    decode_json_column, encode_json_column, Address, Company, Geo, Post, User, UserRow,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn address_strategy() -> impl Strategy<Value = Address> {
    (
        "[A-Za-z0-9 .'-]{0,30}",
        "[A-Za-z0-9 .]{0,15}",
        "[A-Za-z ]{1,20}",
        "[0-9-]{5,10}",
        "-?[0-9]{1,3}\\.[0-9]{4}",
        "-?[0-9]{1,3}\\.[0-9]{4}",
    )
        .prop_map(|(street, suite, city, zipcode, lat, lng)| Address {
            street,
            suite,
            city,
            zipcode,
            geo: Geo { lat, lng },
        })
}

fn company_strategy() -> impl Strategy<Value = Company> {
    ("[A-Za-z -]{1,25}", "\\PC{0,40}", "[a-z -]{0,30}").prop_map(|(name, catch_phrase, bs)| {
        Company {
            name,
            catch_phrase,
            bs,
        }
    })
}

fn user_strategy() -> impl Strategy<Value = User> {
    (
        1i64..100_000,
        "[A-Za-z .]{1,30}",
        "[A-Za-z0-9_.]{1,20}",
        "[a-z0-9.]{1,15}@[a-z]{2,10}\\.[a-z]{2,4}",
        prop::option::of(address_strategy()),
        prop::option::of("[0-9 x().-]{7,25}"),
        prop::option::of("[a-z]{2,15}\\.[a-z]{2,4}"),
        prop::option::of(company_strategy()),
    )
        .prop_map(
            |(id, name, username, email, address, phone, website, company)| User {
                id,
                name,
                username,
                email,
                address,
                phone,
                website,
                company,
            },
        )
}

/// A user stored as a row (nested objects in JSON text columns) reads back unchanged
#[test]
fn property_user_row_round_trip_preserves_nested_objects() {
    proptest!(|(user in user_strategy())| {
        let row = UserRow::try_from(&user).unwrap();
        prop_assert_eq!(row.address.is_some(), user.address.is_some());
        prop_assert_eq!(row.company.is_some(), user.company.is_some());

        let restored = User::try_from(row).unwrap();
        prop_assert_eq!(restored, user);
    });
}

/// Encoded companies keep the source field names
#[test]
fn property_encoded_company_uses_source_field_names() {
    proptest!(|(company in company_strategy())| {
        let encoded = encode_json_column(Some(&company)).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        prop_assert!(value.get("catchPhrase").is_some());
        prop_assert!(value.get("catch_phrase").is_none());
    });
}

/// Blank and `null` columns decode as absent, regardless of padding
#[test]
fn property_blank_json_column_is_absent() {
    proptest!(|(pad in "[ \t]{0,5}", null in any::<bool>())| {
        let raw = if null { format!("{}null{}", pad, pad) } else { pad.clone() };
        let decoded: Option<Address> = decode_json_column(Some(&raw)).unwrap();
        prop_assert!(decoded.is_none());
    });
}

/// Posts always travel with the camel-case `userId` key
#[test]
fn property_post_wire_format_uses_user_id_key() {
    proptest!(|(
        id in 1i64..1_000_000,
        user_id in prop::option::of(1i64..1_000),
        title in "\\PC{0,60}",
        body in "\\PC{0,200}",
    )| {
        let post = Post { id, user_id, title, body };
        let value = serde_json::to_value(&post).unwrap();
        prop_assert!(value.get("user_id").is_none());
        prop_assert_eq!(value["userId"].as_i64(), user_id);

        let parsed: Post = serde_json::from_value(value).unwrap();
        prop_assert_eq!(parsed, post);
    });
}

/// Values in `default.toml` override the compiled-in defaults; keys it omits keep them
#[test]
fn property_file_values_layer_over_defaults() {
    proptest!(ProptestConfig::with_cases(16), |(
        port in 1024u16..65535u16,
        max_connections in 1u32..50u32,
        log_level in prop::sample::select(vec!["trace", "debug", "info", "warn", "error"]),
    )| {
        let temp_dir = TempDir::new().unwrap();
        let config = format!(
            r#"
environment = "development"

[server]
port = {port}

[database]
max_connections = {max_connections}

[observability]
log_level = "{log_level}"
log_format = "pretty"
"#
        );
        fs::write(temp_dir.path().join("default.toml"), config).unwrap();

        let settings = Settings::load_from_path(temp_dir.path()).unwrap();
        prop_assert_eq!(settings.environment, AppEnvironment::Development);
        prop_assert_eq!(settings.database.max_connections, max_connections);
        prop_assert_eq!(settings.observability.log_level.as_str(), log_level);
        prop_assert_eq!(settings.observability.log_format, LogFormat::Pretty);

        let defaults = Settings::default();
        prop_assert_eq!(settings.database.name, defaults.database.name);
        prop_assert_eq!(settings.source.base_url, defaults.source.base_url);
        if std::env::var("PORT").is_err() && std::env::var("APP__SERVER__PORT").is_err() {
            prop_assert_eq!(settings.server.port, port);
        }
    });
}

/// `local.toml` wins over `default.toml`
#[test]
fn test_local_file_overrides_default_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("default.toml"),
        "[source]\nbase_url = \"http://default.test\"\ntimeout_seconds = 5\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("local.toml"),
        "[source]\nbase_url = \"http://local.test\"\n",
    )
    .unwrap();

    let settings = Settings::load_from_path(temp_dir.path()).unwrap();
    assert_eq!(settings.source.base_url, "http://local.test");
    assert_eq!(settings.source.timeout_seconds, 5);
}

/// Without any files the compiled-in defaults apply and are valid
#[test]
fn test_missing_config_directory_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load_from_path(temp_dir.path().join("absent")).unwrap();
    assert_eq!(settings.environment, AppEnvironment::Production);
    assert!(settings.validate().is_ok());
}

/// Out-of-range pool bounds are rejected
#[test]
fn property_validation_rejects_min_above_max() {
    proptest!(|(max in 1u32..20, extra in 1u32..20)| {
        let mut settings = Settings::default();
        settings.database.max_connections = max;
        settings.database.min_connections = max + extra;
        prop_assert!(settings.validate().is_err());
    });
}
