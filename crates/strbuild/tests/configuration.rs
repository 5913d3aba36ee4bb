//! Integration tests for delimiter and encoding configuration.

use strbuild::{ConfigError, Delimiters, Encoding, Marker, Settings, StringBuilder, values};

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn default_markers() {
    let delimiters = Delimiters::default();
    assert_eq!(delimiters.enclosure_begin(), "{:");
    assert_eq!(delimiters.enclosure_end(), "}");
    assert_eq!(delimiters.name_separator(), ":");
    assert_eq!(delimiters.modifier_separator(), "|");
    assert_eq!(delimiters.substitute(), Some(""));
    assert!(delimiters.validate().is_ok());
}

#[test]
fn default_settings() {
    let settings = Settings::new();
    assert_eq!(settings.encoding(), Encoding::Utf8);
    assert!(!settings.auto_escape());
    assert!(settings.implicit_escape().is_none());
    assert!(settings.values().is_empty());
    assert!(settings.converter().is_none());
    assert!(settings.modifiers().contains("escape"));
    assert!(settings.modifiers().contains("raw"));
}

// =============================================================================
// Distinct markers
// =============================================================================

#[test]
fn marker_equal_to_another_is_rejected() {
    let mut delimiters = Delimiters::default();
    let err = delimiters.set_enclosure_begin("|").unwrap_err();
    assert_eq!(
        err,
        ConfigError::ConfigurationConflict {
            field: Marker::EnclosureBegin,
            other: Marker::ModifierSeparator,
            value: "|".to_string(),
        }
    );
    assert_eq!(delimiters, Delimiters::default());
}

#[test]
fn substitute_equal_to_a_marker_is_rejected() {
    let mut delimiters = Delimiters::default();
    let err = delimiters.set_substitute(":").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ConfigurationConflict {
            field: Marker::Substitute,
            other: Marker::NameSeparator,
            ..
        }
    ));
    assert_eq!(delimiters.substitute(), Some(""));
}

#[test]
fn every_setter_enforces_distinctness() {
    let mut delimiters = Delimiters::default();
    assert!(delimiters.set_enclosure_end("{:").is_err());
    assert!(delimiters.set_name_separator("}").is_err());
    assert!(delimiters.set_modifier_separator(":").is_err());
    assert!(delimiters.set_substitute("|").is_err());
    assert_eq!(delimiters, Delimiters::default());
}

#[test]
fn enclosure_pair_is_set_atomically() {
    let mut delimiters = Delimiters::default();
    let err = delimiters.set_enclosure("%%", "%%").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ConfigurationConflict {
            field: Marker::EnclosureBegin,
            other: Marker::EnclosureEnd,
            ..
        }
    ));
    assert_eq!(delimiters.enclosure_begin(), "{:");

    delimiters.set_enclosure("[[", "]]").unwrap();
    assert_eq!(delimiters.enclosure_begin(), "[[");
    assert_eq!(delimiters.enclosure_end(), "]]");
}

#[test]
fn swapping_markers_in_one_call_is_allowed() {
    let mut delimiters = Delimiters::default();
    delimiters.set_enclosure("}", "{:").unwrap();
    assert_eq!(delimiters.enclosure_begin(), "}");
    assert_eq!(delimiters.enclosure_end(), "{:");
}

#[test]
fn empty_marker_is_rejected() {
    let mut delimiters = Delimiters::default();
    assert_eq!(
        delimiters.set_name_separator(""),
        Err(ConfigError::EmptyMarker {
            field: Marker::NameSeparator,
        })
    );
    assert_eq!(delimiters.name_separator(), ":");
}

#[test]
fn echo_unresolved_frees_the_substitute() {
    let mut delimiters = Delimiters::default();
    delimiters.echo_unresolved();
    assert_eq!(delimiters.substitute(), None);
    assert_eq!(delimiters.get(Marker::Substitute), None);
    delimiters.set_substitute("n/a").unwrap();
    assert_eq!(delimiters.substitute(), Some("n/a"));
}

#[test]
fn new_validates_all_markers() {
    let err = Delimiters::new("<", ">", "<", "|", None).unwrap_err();
    assert!(matches!(err, ConfigError::ConfigurationConflict { .. }));
    assert!(Delimiters::new("<", ">", ".", "|", Some("?".to_string())).is_ok());
}

#[test]
fn conflict_message_names_both_markers() {
    let mut delimiters = Delimiters::default();
    let err = delimiters.set_modifier_separator("}").unwrap_err();
    assert_eq!(err.to_string(), r#"modifier separator cannot be the same as the enclosure end: "}""#);
}

// =============================================================================
// Custom markers in builds
// =============================================================================

#[test]
fn custom_enclosure_markers() {
    let mut builder = StringBuilder::new();
    builder.settings_mut().delimiters_mut().set_enclosure("[[", "]]").unwrap();
    let values = values! { "name" => "Ann" };
    assert_eq!(builder.build("Hi [[name]] {:name}", &values, None), "Hi Ann {:name}");
}

#[test]
fn custom_modifier_separator() {
    let mut builder = StringBuilder::new();
    builder.settings_mut().delimiters_mut().set_modifier_separator("=>").unwrap();
    let values = values! { "a" => "<b>" };
    assert_eq!(builder.build("{:a=>e=>raw}", &values, None), "&lt;b&gt;");
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn encoding_names_are_case_insensitive() {
    assert_eq!("utf-8".parse::<Encoding>(), Ok(Encoding::Utf8));
    assert_eq!("UTF8".parse::<Encoding>(), Ok(Encoding::Utf8));
    assert_eq!("us-ascii".parse::<Encoding>(), Ok(Encoding::UsAscii));
    assert_eq!("ascii".parse::<Encoding>(), Ok(Encoding::UsAscii));
    assert_eq!(Encoding::UsAscii.to_string(), "US-ASCII");
}

#[test]
fn unknown_encoding_is_rejected() {
    let mut settings = Settings::new();
    settings.set_encoding("US-ASCII").unwrap();
    assert_eq!(
        settings.set_encoding("latin-1"),
        Err(ConfigError::UnknownEncoding {
            encoding: "latin-1".to_string(),
        })
    );
    assert_eq!(settings.encoding(), Encoding::UsAscii);
}

#[test]
fn encoding_reaches_modifiers() {
    let mut builder = StringBuilder::new();
    let values = values! { "a" => "\u{e9}" };
    assert_eq!(builder.build("{:a|e}", &values, None), "\u{e9}");

    builder.settings_mut().set_encoding("US-ASCII").unwrap();
    assert_eq!(builder.build("{:a|e}", &values, None), "&#xE9;");
}
