use std::fs;

use funcminer::backend::*;
use funcminer::extraction::FunctionSplitter;
use funcminer::types::*;
use tempfile::TempDir;

const CALCULATOR: &str = r#"package demo;

public class Calculator {
    @Override
    public static int[][] grid(String name, long... values) {
        return null;
    }

    private void reset() {}

    enum Mode {
        FAST;

        int speed(int factor) {
            return factor;
        }
    }

    interface Shape {
        double area();
    }

    void callback() {
        Runnable r = new Runnable() {
            public void run() {}
        };
    }
}
"#;

fn split_summaries(source: &str) -> (Vec<FunctionSummary>, Vec<Diagnostic>) {
    let tree = TreeSitterSrcmlFactory::parse_source("Calculator.java", source).unwrap();
    let result = FunctionSplitter::srcml_java().split(tree.root(), "Calculator.java");
    let summaries = result.functions.iter().map(|f| f.summary()).collect();
    (summaries, result.diagnostics)
}

fn find<'a>(summaries: &'a [FunctionSummary], name: &str) -> &'a FunctionSummary {
    summaries
        .iter()
        .find(|s| s.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("function {} not found", name))
}

#[test]
fn test_finds_all_methods_in_source_order() {
    let (summaries, diagnostics) = split_summaries(CALCULATOR);
    assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);
    let names: Vec<_> = summaries.iter().filter_map(|s| s.name.as_deref()).collect();
    assert_eq!(
        names,
        vec!["grid", "reset", "speed", "area", "callback", "run"]
    );
}

#[test]
fn test_method_signature() {
    let (summaries, _) = split_summaries(CALCULATOR);
    let grid = find(&summaries, "grid");
    assert_eq!(grid.return_type.as_deref(), Some("int[][]"));
    assert_eq!(
        grid.modifiers,
        Some(vec!["public".to_string(), "static".to_string()])
    );
    assert_eq!(grid.annotations, Some(vec!["Override".to_string()]));
    assert_eq!(
        grid.parameters,
        Some(vec![
            Parameter {
                name: "name".to_string(),
                param_type: Some("String".to_string()),
            },
            Parameter {
                name: "values".to_string(),
                param_type: Some("long...".to_string()),
            },
        ])
    );
    assert!(grid.has_body);
    assert!(!grid.is_constructor);
}

#[test]
fn test_enclosing_elements() {
    let (summaries, _) = split_summaries(CALCULATOR);

    let reset = find(&summaries, "reset");
    assert_eq!(reset.enclosing_kind, Some(EnclosingKind::Class));
    assert_eq!(reset.enclosing_name.as_deref(), Some("Calculator"));
    assert_eq!(reset.modifiers, Some(vec!["private".to_string()]));
    assert_eq!(reset.return_type.as_deref(), Some("void"));
    assert_eq!(reset.parameters, Some(Vec::new()));

    let speed = find(&summaries, "speed");
    assert_eq!(speed.enclosing_kind, Some(EnclosingKind::Enum));
    assert_eq!(speed.enclosing_name.as_deref(), Some("Mode"));

    let run = find(&summaries, "run");
    assert_eq!(run.enclosing_kind, Some(EnclosingKind::Class));
    assert_eq!(run.enclosing_name, None);
}

#[test]
fn test_abstract_method_has_no_body() {
    let (summaries, _) = split_summaries(CALCULATOR);
    let area = find(&summaries, "area");
    assert!(!area.has_body);
    assert_eq!(area.return_type.as_deref(), Some("double"));
}

#[test]
fn test_anonymous_class_parameters_stay_with_their_method() {
    let (summaries, _) = split_summaries(CALCULATOR);
    assert_eq!(find(&summaries, "callback").parameters, Some(Vec::new()));
}

#[test]
fn test_array_dimensions_on_parameter_name() {
    let source = "class A { void f(String args[], int[] xs) {} }";
    let (summaries, _) = split_summaries(source);
    let params = summaries[0].parameters.clone().unwrap();
    assert_eq!(params[0].param_type.as_deref(), Some("String[]"));
    assert_eq!(params[1].param_type.as_deref(), Some("int[]"));
}

#[test]
fn test_empty_source_has_no_functions() {
    let (summaries, diagnostics) = split_summaries("");
    assert!(summaries.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_factory_creates_handler_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Calculator.java");
    fs::write(&path, CALCULATOR).unwrap();

    let factory = get_handler_factory(Language::Java, ParserFamily::Srcml);
    assert_eq!(factory.language(), Language::Java);
    assert_eq!(factory.parser(), ParserFamily::Srcml);

    let handler = factory.create_handler(&path).unwrap();
    assert!(handler.file_path().ends_with("Calculator.java"));
    assert_eq!(handler.root().label(), "unit");
    assert_eq!(handler.split_into_functions().functions.len(), 6);
}

#[test]
fn test_factory_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let factory = get_handler_factory(Language::Java, ParserFamily::Srcml);
    assert!(factory.create_handler(&dir.path().join("Nope.java")).is_err());
}

#[test]
fn test_antlr_factory_reads_sidecar_dump() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Foo.java");
    fs::write(&source, "class Foo { void bar() {} }").unwrap();
    let dump = r#"{"label":"compilationUnit","children":[
        {"label":"typeDeclaration|classDeclaration","children":[
            {"label":"CLASS","token":"class"},
            {"label":"IDENTIFIER","token":"Foo"},
            {"label":"classBody","children":[
                {"label":"classBodyDeclaration|memberDeclaration|methodDeclaration","children":[
                    {"label":"typeTypeOrVoid|VOID","token":"void"},
                    {"label":"IDENTIFIER","token":"bar"},
                    {"label":"formalParameters","children":[
                        {"label":"LPAREN","token":"("},
                        {"label":"RPAREN","token":")"}
                    ]}
                ]}
            ]}
        ]}
    ]}"#;
    fs::write(dump_path_for(&source), dump).unwrap();
    assert!(dump_path_for(&source)
        .to_string_lossy()
        .ends_with("Foo.java.antlr.json"));

    let factory = get_handler_factory(Language::Java, ParserFamily::Antlr);
    let handler = factory.create_handler(&source).unwrap();
    let split = handler.split_into_functions();
    assert_eq!(split.functions.len(), 1);
    assert_eq!(split.functions[0].name(), Some("bar"));
    assert_eq!(split.functions[0].return_type.as_deref(), Some("void"));
}

#[test]
fn test_antlr_factory_rejects_invalid_dump() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Foo.java");
    fs::write(&source, "class Foo {}").unwrap();
    fs::write(dump_path_for(&source), "not json").unwrap();
    let err = AntlrJavaDumpFactory::load_tree(&source).unwrap_err();
    assert!(matches!(err, funcminer::errors::MinerError::Parse { .. }));
}

#[test]
fn test_array_dimensions_after_method_parameters() {
    let source = "class A { int grid()[] { return null; } String[] rows()[] { return null; } }";
    let (summaries, diagnostics) = split_summaries(source);
    assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);
    assert_eq!(find(&summaries, "grid").return_type.as_deref(), Some("int[]"));
    assert_eq!(find(&summaries, "rows").return_type.as_deref(), Some("String[][]"));
}
