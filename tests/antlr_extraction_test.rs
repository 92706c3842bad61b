use funcminer::errors::MinerError;
use funcminer::extraction::{AntlrJavaExtractor, AntlrLabel, FunctionExtractor};
use funcminer::tree::{RawNode, Tree};
use funcminer::types::*;

fn leaf(label: &str, token: &str) -> RawNode {
    RawNode::leaf(label, token)
}

fn inner(label: &str, children: Vec<RawNode>) -> RawNode {
    RawNode::inner(label, children)
}

fn int_param(name: &str) -> RawNode {
    inner(
        "formalParameter",
        vec![
            leaf("typeType|primitiveType|INT", "int"),
            leaf("variableDeclaratorId|IDENTIFIER", name),
        ],
    )
}

/// `class Foo { <return> bar(<params>) { } }` as an ANTLR Java parse tree.
fn class_with_method(return_type: RawNode, params: Option<RawNode>) -> RawNode {
    let mut formal = vec![leaf("LPAREN", "(")];
    formal.extend(params);
    formal.push(leaf("RPAREN", ")"));

    let method = inner(
        "classBodyDeclaration|memberDeclaration|methodDeclaration",
        vec![
            return_type,
            leaf("IDENTIFIER", "bar"),
            inner("formalParameters", formal),
            inner(
                "methodBody|block",
                vec![leaf("LBRACE", "{"), leaf("RBRACE", "}")],
            ),
        ],
    );
    inner(
        "compilationUnit",
        vec![inner(
            "typeDeclaration|classDeclaration",
            vec![
                leaf("CLASS", "class"),
                leaf("IDENTIFIER", "Foo"),
                inner(
                    "classBody",
                    vec![leaf("LBRACE", "{"), method, leaf("RBRACE", "}")],
                ),
            ],
        )],
    )
}

fn method_root(tree: &Tree) -> funcminer::tree::Node<'_> {
    tree.root()
        .pre_order()
        .find(|n| n.has_last_label(AntlrLabel::MethodDeclaration))
        .unwrap()
}

fn extract(tree: &Tree) -> funcminer::errors::Result<FunctionInfo<'_>> {
    let mut diagnostics = Vec::new();
    let info = AntlrJavaExtractor.extract(method_root(tree), "Foo.java", &mut diagnostics);
    assert!(diagnostics.is_empty());
    info
}

#[test]
fn test_extracts_name_and_body() {
    let tree = Tree::from_raw(&class_with_method(leaf("typeTypeOrVoid|VOID", "void"), None))
        .unwrap();
    let info = extract(&tree).unwrap();
    assert_eq!(info.name(), Some("bar"));
    assert_eq!(info.file_path, "Foo.java");
    assert_eq!(info.body.unwrap().last_label(), "block");
    assert!(info.annotations.is_none());
    assert!(info.modifiers.is_none());
    assert!(!info.is_constructor);
}

#[test]
fn test_no_parameters_gives_empty_list() {
    let tree = Tree::from_raw(&class_with_method(leaf("typeTypeOrVoid|VOID", "void"), None))
        .unwrap();
    let info = extract(&tree).unwrap();
    assert_eq!(info.parameters, Some(Vec::new()));
}

#[test]
fn test_single_collapsed_parameter() {
    let param = inner(
        "formalParameterList|formalParameter",
        vec![
            leaf("typeType|primitiveType|INT", "int"),
            leaf("variableDeclaratorId|IDENTIFIER", "a"),
        ],
    );
    let tree = Tree::from_raw(&class_with_method(
        leaf("typeTypeOrVoid|VOID", "void"),
        Some(param),
    ))
    .unwrap();
    let info = extract(&tree).unwrap();
    assert_eq!(
        info.parameters.unwrap(),
        vec![Parameter {
            name: "a".to_string(),
            param_type: Some("int".to_string()),
        }]
    );
}

#[test]
fn test_multiple_parameters_skip_separators() {
    let list = inner(
        "formalParameterList",
        vec![
            int_param("a"),
            leaf("COMMA", ","),
            int_param("b"),
            leaf("COMMA", ","),
            inner(
                "lastFormalParameter",
                vec![
                    leaf("typeType|classOrInterfaceType|IDENTIFIER", "String"),
                    leaf("ELLIPSIS", "..."),
                    leaf("variableDeclaratorId|IDENTIFIER", "rest"),
                ],
            ),
        ],
    );
    let tree = Tree::from_raw(&class_with_method(
        leaf("typeTypeOrVoid|VOID", "void"),
        Some(list),
    ))
    .unwrap();
    let info = extract(&tree).unwrap();
    let params = info.parameters.unwrap();
    let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "rest"]);
    assert_eq!(params[2].param_type.as_deref(), Some("String"));
}

#[test]
fn test_return_type_concatenates_leaf_tokens() {
    let return_type = inner(
        "typeTypeOrVoid|typeType",
        vec![inner(
            "classOrInterfaceType",
            vec![
                leaf("IDENTIFIER", "Map"),
                inner(
                    "typeArguments",
                    vec![
                        leaf("LT", "<"),
                        leaf("typeArgument|typeType|classOrInterfaceType|IDENTIFIER", "String"),
                        leaf("COMMA", ","),
                        leaf("typeArgument|typeType|primitiveType|INT", "int"),
                        leaf("GT", ">"),
                    ],
                ),
            ],
        )],
    );
    let tree = Tree::from_raw(&class_with_method(return_type, None)).unwrap();
    let info = extract(&tree).unwrap();
    assert_eq!(info.return_type.as_deref(), Some("Map<String,int>"));
}

#[test]
fn test_missing_return_type_is_none() {
    let mut raw = class_with_method(leaf("typeTypeOrVoid|VOID", "void"), None);
    // Drop the typeTypeOrVoid child of the method.
    let method = &mut raw.children[0].children[2].children[1];
    method.children.remove(0);
    let tree = Tree::from_raw(&raw).unwrap();
    let info = extract(&tree).unwrap();
    assert!(info.return_type.is_none());
}

#[test]
fn test_enclosing_class_from_collapsed_label() {
    let tree = Tree::from_raw(&class_with_method(leaf("typeTypeOrVoid|VOID", "void"), None))
        .unwrap();
    let info = extract(&tree).unwrap();
    let enclosing = info.enclosing_element.unwrap();
    assert_eq!(enclosing.kind, EnclosingKind::Class);
    assert_eq!(enclosing.name.as_deref(), Some("Foo"));
    assert_eq!(enclosing.root.label(), "typeDeclaration|classDeclaration");
}

#[test]
fn test_top_level_method_has_no_enclosing_class() {
    let raw = inner(
        "compilationUnit",
        vec![inner(
            "methodDeclaration",
            vec![
                leaf("typeTypeOrVoid", "void"),
                leaf("IDENTIFIER", "free"),
            ],
        )],
    );
    let tree = Tree::from_raw(&raw).unwrap();
    let info = extract(&tree).unwrap();
    assert!(info.enclosing_element.is_none());
    assert_eq!(info.parameters, Some(Vec::new()));
    assert!(info.body.is_none());
}

#[test]
fn test_missing_parameter_name_fails_function() {
    let param = inner(
        "formalParameterList|formalParameter",
        vec![leaf("typeType|primitiveType|INT", "int")],
    );
    let tree = Tree::from_raw(&class_with_method(
        leaf("typeTypeOrVoid|VOID", "void"),
        Some(param),
    ))
    .unwrap();
    let err = extract(&tree).unwrap_err();
    assert!(matches!(err, MinerError::MissingParameterName { .. }));
}

#[test]
fn test_non_leaf_declarator_fails_function() {
    let param = inner(
        "formalParameterList|formalParameter",
        vec![
            leaf("typeType|primitiveType|INT", "int"),
            inner(
                "variableDeclaratorId",
                vec![
                    leaf("IDENTIFIER", "xs"),
                    leaf("LBRACK", "["),
                    leaf("RBRACK", "]"),
                ],
            ),
        ],
    );
    let tree = Tree::from_raw(&class_with_method(
        leaf("typeTypeOrVoid|VOID", "void"),
        Some(param),
    ))
    .unwrap();
    let err = extract(&tree).unwrap_err();
    assert!(matches!(err, MinerError::NotALeaf { .. }));
}
