use pretty_assertions::assert_eq;
use rift::{
    analyzer::{self, ParseError},
    config::{ConfigError, ConfigSection, Governance, Stage, StageConfig, StaticGovernance},
    coordinator::passes::{CONSTANT_FOLDING, DEAD_CODE_ELIMINATION},
    run_pipeline,
    tokenizer::{
        pattern::PatternRule,
        token::{self, TokenCategory},
    },
    AstNode, BinaryOperator, Pipeline, PipelineError,
};

pub mod governance_test;

fn defaults() -> StaticGovernance {
    StaticGovernance::rift_defaults()
}

#[test]
fn test_tokenize_reference_expression() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();
    let stream = token::tokenize(&rules, "x + 2 * y").unwrap();

    let summary: Vec<_> = stream
        .iter()
        .map(|t| (t.category, t.text.as_str(), t.priority, t.line, t.column))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TokenCategory::Identifier, "x", 100, 1, 1),
            (TokenCategory::Operator, "+", 80, 1, 2),
            (TokenCategory::Number, "2", 90, 1, 3),
            (TokenCategory::Operator, "*", 80, 1, 4),
            (TokenCategory::Identifier, "y", 100, 1, 5),
        ]
    );
}

#[test]
fn test_parse_reference_expressions() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();

    let ast = analyzer::parse(token::tokenize(&rules, "x + 2 * y").unwrap()).unwrap();
    assert_eq!(
        ast,
        AstNode::binary(
            BinaryOperator::Add,
            AstNode::identifier("x"),
            AstNode::binary(
                BinaryOperator::Multiply,
                AstNode::number("2"),
                AstNode::identifier("y"),
            ),
        )
    );

    let ast = analyzer::parse(token::tokenize(&rules, "a - b - c").unwrap()).unwrap();
    assert_eq!(
        ast,
        AstNode::binary(
            BinaryOperator::Subtract,
            AstNode::binary(
                BinaryOperator::Subtract,
                AstNode::identifier("a"),
                AstNode::identifier("b"),
            ),
            AstNode::identifier("c"),
        )
    );
}

#[test]
fn test_empty_input() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();
    let stream = token::tokenize(&rules, "   \t\n ").unwrap();
    assert!(stream.is_empty());
    assert!(matches!(
        analyzer::parse(stream),
        Err(ParseError::UnexpectedEnd { position: 0, .. })
    ));
}

#[test]
fn test_whitespace_rule_never_fires() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();
    assert!(rules
        .iter()
        .any(|rule| rule.category == TokenCategory::Whitespace));

    let stream = token::tokenize(&rules, "  a\t+ 1 \n * ? _b  ").unwrap();
    assert_eq!(stream.len(), 6);
    assert!(stream
        .iter()
        .all(|t| t.category != TokenCategory::Whitespace));
}

#[test]
fn test_full_pipeline_output() {
    let output = run_pipeline("x + 2 * y", &defaults()).unwrap();
    let expected = "\
(BinOp +
  (Identifier x)
  (BinOp *
    (Number 2)
    (Identifier y)
  )
)
";
    assert_eq!(output.text, expected);
    assert_eq!(output.token_count, 5);
    assert_eq!(output.node_count, 5);
    assert_eq!(
        output.applied_passes,
        vec![CONSTANT_FOLDING, DEAD_CODE_ELIMINATION]
    );

    let json = output.json.unwrap();
    let exported: AstNode = serde_json::from_str(&json).unwrap();
    assert_eq!(exported.node_count(), output.node_count);
}

#[test]
fn test_pipeline_folds_and_reports_counts() {
    let pipeline = Pipeline::from_governance(&defaults()).unwrap();

    let output = pipeline.run("width * 2 + 10 / 4").unwrap();
    assert_eq!(output.nodes_before_optimization, 7);
    assert_eq!(output.node_count, 5);
    assert_eq!(
        output.text,
        "(BinOp +\n  (BinOp *\n    (Identifier width)\n    (Number 2)\n  )\n  (Number 2.5)\n)\n"
    );

    let output = pipeline.run("1 / 0").unwrap();
    assert_eq!(output.node_count, 3);
}

#[test]
fn test_pipeline_errors_name_the_failed_stage() {
    let err = run_pipeline("x + * y", &defaults()).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Parser));
    match err {
        PipelineError::Parse(ParseError::UnexpectedToken {
            found, position, ..
        }) => {
            assert_eq!(found, "OPERATOR \"*\"");
            assert_eq!(position, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = run_pipeline("x y", &defaults()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse(ParseError::UnexpectedToken { position: 1, .. })
    ));
}

#[test]
fn test_unknown_lexemes_reach_the_parser() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();
    let stream = token::tokenize(&rules, "x + $").unwrap();
    let last = stream.get(2).unwrap();
    assert_eq!(last.category, TokenCategory::Unknown);
    assert_eq!(last.priority, 0);

    let err = run_pipeline("x + $", &defaults()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse(ParseError::UnexpectedToken { position: 2, .. })
    ));
}

#[test]
fn test_non_ascii_digits_are_not_numbers() {
    let rules = defaults().get_pattern_rules(Stage::Tokenizer).unwrap();
    let stream = token::tokenize(&rules, "\u{663} + 1").unwrap();
    assert_eq!(stream.get(0).unwrap().category, TokenCategory::Unknown);

    let err = run_pipeline("\u{663} + 1", &defaults()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse(ParseError::UnexpectedToken { position: 0, .. })
    ));
}

#[test]
fn test_integer_overflow_folds_through_pipeline() {
    let output = run_pipeline("99999999999999999999 + 1", &defaults()).unwrap();
    assert_eq!(output.text, "(Number 100000000000000000000)\n");

    let output = run_pipeline("9223372036854775807 * 2", &defaults()).unwrap();
    assert_eq!(output.text, "(Number 18446744073709552000)\n");
    assert_eq!(output.node_count, 1);
}

#[test]
fn test_malformed_pattern_is_skipped() {
    let governance = defaults().with_stage(
        Stage::Tokenizer,
        StageConfig::new("TOKENIZER", "LEXICAL_ANALYSIS", "1.0.0").with_section(
            "TOKEN_PATTERNS",
            ConfigSection::new()
                .with("IDENTIFIER_PATTERN", "[a-z")
                .with("IDENTIFIER_PRIORITY", "100")
                .with("NUMBER_PATTERN", r"\d+")
                .with("NUMBER_PRIORITY", "90")
                .with("OPERATOR_PATTERN", r"[+\-*/]")
                .with("OPERATOR_PRIORITY", "80"),
        ),
    );
    let pipeline = Pipeline::from_governance(&governance).unwrap();
    assert_eq!(pipeline.tokenizer().classifier().compile_errors().len(), 1);

    assert_eq!(pipeline.run("6 * 7").unwrap().text, "(Number 42)\n");
    assert!(pipeline.run("x").is_err());
}

#[test]
fn test_custom_rules_tie_break() {
    let rules = vec![
        PatternRule::new(r"[a-z]+", TokenCategory::Identifier, 50),
        PatternRule::new(r"[a-z0-9]+", TokenCategory::Number, 50),
    ];
    let stream = token::tokenize(&rules, "abc 123").unwrap();
    assert_eq!(stream.get(0).unwrap().category, TokenCategory::Identifier);
    assert_eq!(stream.get(1).unwrap().category, TokenCategory::Number);
}

#[test]
fn test_missing_renderer_stage() {
    let defaults = defaults();
    let mut governance = StaticGovernance::new();
    for stage in defaults.loaded_stages().filter(|s| *s != Stage::Renderer) {
        governance.insert_stage(stage, defaults.stage_config(stage).unwrap().clone());
    }

    let err = run_pipeline("x", &governance).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::Missing {
            stage: Stage::Renderer,
            ..
        })
    ));
}
