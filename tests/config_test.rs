use std::fs;

use funcminer::backend::{Language, ParserFamily};
use funcminer::config::*;
use funcminer::errors::MinerError;
use funcminer::pipeline::{Filter, LabelExtractor};
use tempfile::TempDir;

fn sample_config() -> PipelineConfig {
    PipelineConfig {
        input_dir: "data/java".into(),
        output_dir: "out".into(),
        parser: ParserConfig {
            name: ParserFamily::Antlr,
            languages: vec![Language::Java],
        },
        filters: vec![
            FilterConfig::TreeSize {
                min_size: 3,
                max_size: Some(500),
            },
            FilterConfig::NoConstructors,
        ],
        label: LabelConfig::FunctionName,
        storage: StorageConfig::Jsonl,
        exclude: vec!["**/test/**".to_string()],
    }
}

#[test]
fn test_load_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipeline.json");
    fs::write(
        &path,
        r#"{
            "input_dir": "src",
            "output_dir": "out",
            "parser": { "name": "srcml", "languages": ["java"] },
            "filters": [
                { "name": "modifiers", "excluded": ["private"] },
                { "name": "function_name_words", "max_words": 3 }
            ],
            "label": { "name": "function_name" }
        }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.parser.name, ParserFamily::Srcml);
    assert_eq!(config.parser.languages, vec![Language::Java]);
    assert_eq!(
        config.filters,
        vec![
            FilterConfig::Modifiers {
                excluded: vec!["private".to_string()],
            },
            FilterConfig::FunctionNameWords { max_words: 3 },
        ]
    );
    assert_eq!(config.label, LabelConfig::FunctionName);
    assert_eq!(config.storage, StorageConfig::Jsonl);
    assert!(config.exclude.is_empty());
}

#[test]
fn test_load_toml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipeline.toml");
    fs::write(
        &path,
        r#"
input_dir = "src"
output_dir = "out"
exclude = ["generated/**"]

[parser]
name = "antlr"
languages = ["java"]

[[filters]]
name = "tree_size"
min_size = 5

[label]
name = "folder_name"

[storage]
format = "jsonl"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.parser.name, ParserFamily::Antlr);
    assert_eq!(
        config.filters,
        vec![FilterConfig::TreeSize {
            min_size: 5,
            max_size: None,
        }]
    );
    assert_eq!(config.label, LabelConfig::FolderName);
    assert_eq!(config.exclude, vec!["generated/**".to_string()]);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("pipeline.json");
    let config = sample_config();
    save_config(&path, &config).unwrap();
    assert!(!path.with_extension("tmp").exists());
    let loaded = load_config(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_unknown_filter_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "input_dir": "src",
            "output_dir": "out",
            "parser": { "name": "srcml", "languages": ["java"] },
            "filters": [{ "name": "by_magic" }],
            "label": { "name": "file_name" }
        }"#,
    )
    .unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, MinerError::Config { .. }));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, MinerError::Config { .. }));
}

#[test]
fn test_built_components_report_names() {
    let config = sample_config();
    let filters: Vec<_> = config.filters.iter().map(|f| f.build()).collect();
    let names: Vec<_> = filters.iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, vec!["by tree size", "no constructors"]);
    assert_eq!(config.label.build().name(), "function name");
}

#[test]
fn test_is_excluded() {
    let exclude = vec!["**/test/**".to_string(), "generated/*".to_string()];
    assert!(is_excluded("src/test/Foo.java", &exclude));
    assert!(is_excluded("generated/Gen.java", &exclude));
    assert!(!is_excluded("src/main/Foo.java", &exclude));
    assert!(!is_excluded("src/Foo.java", &[]));
}

#[test]
fn test_default_config_is_saved_as_loadable_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("funcminer.json");
    let config = PipelineConfig::default();
    save_config(&path, &config).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["parser"]["name"], "srcml");
    assert_eq!(json["label"]["name"], "function_name");
    assert_eq!(json["storage"]["format"], "jsonl");

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.parser.languages, vec![Language::Java]);
    assert!(loaded.filters.is_empty());
}
